//! Count changes between rebuilds.
//!
//! Counts are replaced by a single atomic store into the live slot, so a
//! reader sees either the old or the new value. The exact index may also
//! grow by one entry per new tag; the fragment index never grows, so a tag
//! first seen after the last rebuild is not reachable by infix search until
//! the next one.

use tracing::debug;

use crate::entry::{apply_delta, IndexEntry};
use crate::fold::search_form;
use crate::fragments::suffixes;
use crate::indexes::Indexes;

/// What a count change did to the exact index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactUpdate {
    /// Existing entry now has this count.
    Updated { count: u64 },
    /// Tag was new and has been added with the delta as its count.
    Inserted,
    /// Nothing changed: no index yet, or a decrement for an unknown tag.
    Ignored,
}

impl Indexes {
    /// Apply `delta` to the tag's exact entry, inserting it on a positive
    /// delta if it is missing.
    pub fn apply_exact_delta(&self, tag: &str, delta: i64) -> ExactUpdate {
        let _guard = self.lock_writes();
        let Some(index) = self.exact() else {
            return ExactUpdate::Ignored;
        };

        match index.find_key(tag) {
            Ok(position) => {
                let slot = &index.slots()[position];
                let count = apply_delta(slot.count(), delta);
                slot.store_count(count);
                ExactUpdate::Updated { count }
            }
            Err(position) if delta > 0 => {
                let grown = index.with_inserted(position, &IndexEntry::new(tag, tag, delta as u64));
                self.store_exact(grown);
                ExactUpdate::Inserted
            }
            Err(_) => ExactUpdate::Ignored,
        }
    }

    /// Apply `delta` to every fragment entry of the tag that is already
    /// indexed. Returns how many entries changed.
    pub fn apply_fragment_deltas(&self, tag: &str, delta: i64) -> usize {
        let _guard = self.lock_writes();
        let Some(index) = self.fragments() else {
            return 0;
        };

        let mut updated = 0;
        for fragment in suffixes(tag) {
            let Some(range) = index.prefix_range(&search_form(fragment)) else {
                continue;
            };
            for slot in &index.slots()[range] {
                if &*slot.key == fragment && &*slot.tag == tag {
                    slot.store_count(apply_delta(slot.count(), delta));
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Apply one count change to both indexes.
    pub fn apply_delta(&self, tag: &str, delta: i64) -> ExactUpdate {
        let exact = self.apply_exact_delta(tag, delta);
        let fragments = self.apply_fragment_deltas(tag, delta);
        debug!(tag, delta, ?exact, fragments, "tag count changed");
        exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use mediatag_types::TagFrequency;
    use pretty_assertions::assert_eq;

    fn indexed(tags: &[(&str, u64)]) -> Indexes {
        let snapshot: Vec<TagFrequency> = tags
            .iter()
            .map(|(t, c)| TagFrequency::new(*t, *c))
            .collect();
        let indexes = Indexes::new();
        indexes.publish(build(&snapshot, 20));
        indexes
    }

    #[test]
    fn changes_before_first_rebuild_are_ignored() {
        let indexes = Indexes::new();
        assert_eq!(indexes.apply_delta("ff", 1), ExactUpdate::Ignored);
        assert!(indexes.exact().is_none());
    }

    #[test]
    fn increments_existing_tag() {
        let indexes = indexed(&[("ff", 1)]);
        assert_eq!(indexes.apply_delta("ff", 1), ExactUpdate::Updated { count: 2 });
        assert_eq!(indexes.suggest_exact("f", 20), vec![TagFrequency::new("ff", 2)]);
    }

    #[test]
    fn inserts_new_tag_in_order() {
        let indexes = indexed(&[("aa", 1), ("ff", 1), ("zz", 1)]);
        assert_eq!(indexes.apply_delta("fa", 1), ExactUpdate::Inserted);
        assert_eq!(indexes.apply_delta("fff", 5), ExactUpdate::Inserted);

        let tags: Vec<String> = indexes
            .exact()
            .unwrap()
            .entries()
            .into_iter()
            .map(|e| e.tag)
            .collect();
        assert_eq!(tags, vec!["aa", "fa", "ff", "fff", "zz"]);
        assert_eq!(
            indexes.suggest_exact("fff", 20),
            vec![TagFrequency::new("fff", 5)]
        );
    }

    #[test]
    fn decrement_of_unknown_tag_is_ignored() {
        let indexes = indexed(&[("ff", 1)]);
        assert_eq!(indexes.apply_delta("gg", -1), ExactUpdate::Ignored);
        assert_eq!(indexes.exact().unwrap().len(), 1);
    }

    #[test]
    fn decrement_floors_at_zero_and_keeps_entry() {
        let indexes = indexed(&[("gg", 1)]);
        assert_eq!(indexes.apply_delta("gg", -1), ExactUpdate::Updated { count: 0 });
        assert_eq!(indexes.apply_delta("gg", -1), ExactUpdate::Updated { count: 0 });
        assert_eq!(indexes.suggest_exact("g", 20), vec![TagFrequency::new("gg", 0)]);
    }

    #[test]
    fn updates_every_fragment_of_the_tag() {
        let indexes = indexed(&[("foobar", 1), ("bar", 4)]);
        assert_eq!(indexes.apply_fragment_deltas("foobar", 2), 5);

        assert_eq!(
            indexes.suggest_fragment("ar", 20),
            vec![TagFrequency::new("bar", 4), TagFrequency::new("foobar", 3)]
        );
        assert_eq!(
            indexes.suggest_fragment("oob", 20),
            vec![TagFrequency::new("foobar", 3)]
        );
    }

    #[test]
    fn fragment_update_leaves_other_tags_alone() {
        let indexes = indexed(&[("xbar", 1), ("ybar", 1)]);
        indexes.apply_fragment_deltas("xbar", 1);
        assert_eq!(
            indexes.suggest_fragment("bar", 20),
            vec![TagFrequency::new("xbar", 2), TagFrequency::new("ybar", 1)]
        );
    }

    #[test]
    fn new_tags_are_not_added_to_fragment_index() {
        let indexes = indexed(&[("ff", 1)]);
        let before = indexes.fragments().unwrap().len();
        assert_eq!(indexes.apply_delta("zzz", 1), ExactUpdate::Inserted);
        assert_eq!(indexes.fragments().unwrap().len(), before);
        assert!(indexes.suggest_fragment("zz", 20).is_empty());
    }

    #[test]
    fn reader_snapshot_taken_before_insert_is_unchanged() {
        let indexes = indexed(&[("aa", 1)]);
        let held = indexes.exact().unwrap();
        indexes.apply_delta("bb", 1);
        assert_eq!(held.len(), 1);
        assert_eq!(indexes.exact().unwrap().len(), 2);
    }
}
