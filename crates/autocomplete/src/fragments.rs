//! Suffix fragments: turn "contains" search into prefix search.
//!
//! A tag `foobar` is indexed under `oobar`, `obar`, `bar`, `ar` and `r`, so
//! a prefix lookup for `ba` finds it through `bar`.

use std::sync::Arc;

use crate::entry::IndexSlot;

/// The proper suffixes of `tag` worth indexing, longest first.
///
/// Offsets are in characters, not bytes. Suffixes starting with whitespace
/// are skipped: `"power line"` yields `line` but not `" line"`. Tags shorter
/// than two characters have no suffixes.
pub fn suffixes(tag: &str) -> impl Iterator<Item = &str> + '_ {
    tag.char_indices()
        .skip(1)
        .filter(|(_, c)| !c.is_whitespace())
        .map(move |(offset, _)| &tag[offset..])
}

/// Fragment index slots for one tag: one per suffix, each sharing the
/// whole tag and carrying its file count.
pub(crate) fn fragment_slots(
    tag: &Arc<str>,
    file_count: u64,
) -> impl Iterator<Item = IndexSlot> + '_ {
    suffixes(tag)
        .map(move |suffix| IndexSlot::new(Arc::from(suffix), Arc::clone(tag), file_count))
}
