//! Sorted index array and the prefix lookup shared by both indexes.
//!
//! Binary search and then step backwards/forwards: the search lands on
//! *some* entry of the matching cluster, the scan grows it to the whole
//! contiguous range.

use std::cmp::Ordering;
use std::ops::Range;

use mediatag_types::TagFrequency;

use crate::entry::{IndexEntry, IndexSlot};
use crate::fold::search_form;

/// An immutable-shape array of index slots in index order
/// (see [`IndexSlot::cmp_index_order`]).
///
/// Only counts change after construction; growing the array means building
/// a new one with [`SortedIndex::with_inserted`].
#[derive(Debug, Default)]
pub struct SortedIndex {
    slots: Vec<IndexSlot>,
}

/// Orders a candidate's search form against a folded prefix, treating any
/// candidate that starts with the prefix as equal.
///
/// Monotone over an array sorted by search form, so `binary_search_by`
/// lands inside the matching cluster when one exists.
fn prefix_cmp(candidate: &str, prefix: &str) -> Ordering {
    if candidate.starts_with(prefix) {
        Ordering::Equal
    } else {
        candidate.cmp(prefix)
    }
}

impl SortedIndex {
    /// Sort `slots` into index order and wrap them.
    pub(crate) fn from_unsorted(mut slots: Vec<IndexSlot>) -> Self {
        slots.sort_by(IndexSlot::cmp_index_order);
        Self { slots }
    }

    /// Wrap slots already in index order.
    pub(crate) fn from_sorted(slots: Vec<IndexSlot>) -> Self {
        debug_assert!(slots
            .windows(2)
            .all(|w| w[0].cmp_index_order(&w[1]) != Ordering::Greater));
        Self { slots }
    }

    pub(crate) fn slots(&self) -> &[IndexSlot] {
        &self.slots
    }

    pub(crate) fn into_slots(self) -> Vec<IndexSlot> {
        self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of every entry in index order.
    pub fn entries(&self) -> Vec<IndexEntry> {
        self.slots.iter().map(IndexSlot::entry).collect()
    }

    /// Range of slots whose search form starts with `folded_prefix`.
    ///
    /// `folded_prefix` must already be in search form. Returns `None` when
    /// nothing matches.
    pub fn prefix_range(&self, folded_prefix: &str) -> Option<Range<usize>> {
        let hit = self
            .slots
            .binary_search_by(|slot| prefix_cmp(&slot.folded, folded_prefix))
            .ok()?;

        let matches = |i: usize| self.slots[i].folded.starts_with(folded_prefix);
        let mut start = hit;
        while start > 0 && matches(start - 1) {
            start -= 1;
        }
        let mut end = hit + 1;
        while end < self.slots.len() && matches(end) {
            end += 1;
        }
        Some(start..end)
    }

    /// Position of the slot with exactly this key, or the insertion point
    /// that keeps the array in index order.
    ///
    /// Assumes keys are unique, which holds for the exact index.
    pub(crate) fn find_key(&self, key: &str) -> Result<usize, usize> {
        let folded = search_form(key);
        self.slots.binary_search_by(|slot| {
            (&*slot.folded, &*slot.key).cmp(&(folded.as_str(), key))
        })
    }

    /// New index with `entry` spliced in at `position`.
    pub(crate) fn with_inserted(&self, position: usize, entry: &IndexEntry) -> Self {
        let mut slots = Vec::with_capacity(self.slots.len() + 1);
        slots.extend(self.slots[..position].iter().map(IndexSlot::duplicate));
        slots.push(IndexSlot::from_entry(entry));
        slots.extend(self.slots[position..].iter().map(IndexSlot::duplicate));
        Self::from_sorted(slots)
    }

    /// Ranked, de-duplicated suggestions for `prefix`.
    ///
    /// Matching is a case- and diacritic-insensitive prefix match on the
    /// key. Matches are ranked by count descending then tag ascending, cut
    /// to `limit`, then collapsed so a tag reached through several fragments
    /// appears once.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<TagFrequency> {
        let folded = search_form(prefix);
        let Some(range) = self.prefix_range(&folded) else {
            return Vec::new();
        };

        // Read each count once so ranking sees a consistent value per slot.
        let mut ranked: Vec<(u64, &str)> = self.slots[range]
            .iter()
            .map(|slot| (slot.count(), &*slot.tag))
            .collect();
        let by_rank = |a: &(u64, &str), b: &(u64, &str)| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1));

        if ranked.len() > limit {
            if limit == 0 {
                return Vec::new();
            }
            ranked.select_nth_unstable_by(limit - 1, by_rank);
            ranked.truncate(limit);
        }
        ranked.sort_unstable_by(by_rank);

        let mut out: Vec<TagFrequency> = ranked
            .into_iter()
            .map(|(count, tag)| TagFrequency::new(tag, count))
            .collect();
        // Equal (count, tag) pairs are adjacent after ranking.
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index_of(entries: &[(&str, &str, u64)]) -> SortedIndex {
        SortedIndex::from_unsorted(
            entries
                .iter()
                .map(|(k, t, c)| IndexSlot::from_entry(&IndexEntry::new(*k, *t, *c)))
                .collect(),
        )
    }

    fn keys(index: &SortedIndex, range: Range<usize>) -> Vec<String> {
        index.slots[range].iter().map(|s| s.key.to_string()).collect()
    }

    #[test]
    fn prefix_range_finds_whole_cluster() {
        let index = index_of(&[
            ("apple", "apple", 1),
            ("bar", "bar", 1),
            ("bat", "bat", 1),
            ("batch", "batch", 1),
            ("cat", "cat", 1),
        ]);
        let range = index.prefix_range("ba").unwrap();
        assert_eq!(keys(&index, range), vec!["bar", "bat", "batch"]);
    }

    #[test]
    fn prefix_range_misses() {
        let index = index_of(&[("bar", "bar", 1), ("cat", "cat", 1)]);
        assert_eq!(index.prefix_range("zzz"), None);
        assert_eq!(index.prefix_range("bb"), None);
        assert_eq!(SortedIndex::default().prefix_range("a"), None);
    }

    #[test]
    fn prefix_range_empty_prefix_is_everything() {
        let index = index_of(&[("a", "a", 1), ("b", "b", 1), ("c", "c", 1)]);
        assert_eq!(index.prefix_range(""), Some(0..3));
    }

    #[test]
    fn prefix_range_spans_case_variants() {
        let index = index_of(&[
            ("power line", "power line", 1),
            ("powerPuff", "powerPuff", 1),
            ("power_lines", "power_lines", 1),
            ("powerline", "powerline", 1),
            ("powerpuff_girls_z", "powerpuff_girls_z", 1),
            ("powerPuff_girls", "powerPuff_girls", 1),
            ("powers_", "powers_", 1),
        ]);
        let range = index.prefix_range("powerp").unwrap();
        assert_eq!(
            keys(&index, range),
            vec!["powerPuff", "powerPuff_girls", "powerpuff_girls_z"]
        );
    }

    #[test]
    fn suggest_ranks_by_count_then_tag() {
        let index = index_of(&[
            ("fooa", "fooa", 2),
            ("foob", "foob", 9),
            ("fooc", "fooc", 2),
            ("bar", "bar", 100),
        ]);
        assert_eq!(
            index.suggest("FOO", 20),
            vec![
                TagFrequency::new("foob", 9),
                TagFrequency::new("fooa", 2),
                TagFrequency::new("fooc", 2),
            ]
        );
    }

    #[test]
    fn suggest_truncates_to_limit() {
        let entries: Vec<(String, u64)> = (0..30).map(|i| (format!("t{i:02}"), i)).collect();
        let borrowed: Vec<(&str, &str, u64)> =
            entries.iter().map(|(t, c)| (t.as_str(), t.as_str(), *c)).collect();
        let index = index_of(&borrowed);

        let out = index.suggest("t", 5);
        assert_eq!(
            out,
            vec![
                TagFrequency::new("t29", 29),
                TagFrequency::new("t28", 28),
                TagFrequency::new("t27", 27),
                TagFrequency::new("t26", 26),
                TagFrequency::new("t25", 25),
            ]
        );
        assert!(index.suggest("t", 0).is_empty());
    }

    #[test]
    fn suggest_deduplicates_tags_reached_twice() {
        // "123923" is indexed under both "23923" and "23".
        let index = index_of(&[
            ("23923", "123923", 2),
            ("23", "123923", 2),
            ("2", "12", 1),
        ]);
        assert_eq!(
            index.suggest("2", 20),
            vec![TagFrequency::new("123923", 2), TagFrequency::new("12", 1)]
        );
    }

    #[test]
    fn find_key_exact_and_insertion_point() {
        let index = index_of(&[("aa", "aa", 1), ("ff", "ff", 1), ("zz", "zz", 1)]);
        assert_eq!(index.find_key("ff"), Ok(1));
        assert_eq!(index.find_key("a"), Err(0));
        assert_eq!(index.find_key("fa"), Err(1));
        assert_eq!(index.find_key("fff"), Err(2));
        assert_eq!(index.find_key("zzz"), Err(3));
        assert_eq!(index.find_key("FF"), Err(1), "exact keys are case-sensitive");
    }

    #[test]
    fn with_inserted_keeps_order_and_counts() {
        let index = index_of(&[("aa", "aa", 1), ("zz", "zz", 3)]);
        index.slots[0].store_count(5);
        let grown = index.with_inserted(1, &IndexEntry::new("mm", "mm", 1));
        assert_eq!(
            grown.entries(),
            vec![
                IndexEntry::new("aa", "aa", 5),
                IndexEntry::new("mm", "mm", 1),
                IndexEntry::new("zz", "zz", 3),
            ]
        );
        assert_eq!(index.len(), 2, "source array is not modified");
    }
}
