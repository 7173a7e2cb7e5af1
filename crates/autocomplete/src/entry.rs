//! Index entries and the slots that hold them inside a published array.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::fold::search_form;

/// One row of either index.
///
/// In the exact index `key == tag`; in the fragment index `key` is a suffix
/// of `tag`. Published indexes hand these out as snapshots; counts change
/// in place through the slot, never through an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    pub key: String,
    pub tag: String,
    pub count: u64,
}

impl IndexEntry {
    pub fn new(key: impl Into<String>, tag: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            tag: tag.into(),
            count,
        }
    }

}

/// `count + delta`, floored at zero.
pub(crate) fn apply_delta(count: u64, delta: i64) -> u64 {
    if delta < 0 {
        count.saturating_sub(delta.unsigned_abs())
    } else {
        count.saturating_add(delta as u64)
    }
}

/// An entry as stored in a published [`SortedIndex`](crate::index::SortedIndex).
///
/// `key` and `tag` never change once the slot exists. `count` is the one
/// mutable cell: the writer replaces it with a single atomic store, readers
/// load it without locking.
#[derive(Debug)]
pub(crate) struct IndexSlot {
    /// `key` in search collation; the primary sort key.
    pub(crate) folded: Arc<str>,
    pub(crate) key: Arc<str>,
    pub(crate) tag: Arc<str>,
    count: AtomicU64,
}

impl IndexSlot {
    pub(crate) fn new(key: Arc<str>, tag: Arc<str>, count: u64) -> Self {
        Self {
            folded: Arc::from(search_form(&key)),
            key,
            tag,
            count: AtomicU64::new(count),
        }
    }

    pub(crate) fn from_entry(entry: &IndexEntry) -> Self {
        Self::new(
            Arc::from(entry.key.as_str()),
            Arc::from(entry.tag.as_str()),
            entry.count,
        )
    }

    pub(crate) fn count(&self) -> u64 {
        self.count.load(AtomicOrdering::Acquire)
    }

    pub(crate) fn store_count(&self, count: u64) {
        self.count.store(count, AtomicOrdering::Release);
    }

    /// Independent copy carrying the current count, for whole-array rebuilds.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            folded: Arc::clone(&self.folded),
            key: Arc::clone(&self.key),
            tag: Arc::clone(&self.tag),
            count: AtomicU64::new(self.count()),
        }
    }

    pub(crate) fn entry(&self) -> IndexEntry {
        IndexEntry::new(&*self.key, &*self.tag, self.count())
    }

    /// Array order: search form, then exact key, then count descending, then
    /// tag ascending.
    pub(crate) fn cmp_index_order(&self, other: &Self) -> Ordering {
        self.folded
            .cmp(&other.folded)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| other.count().cmp(&self.count()))
            .then_with(|| self.tag.cmp(&other.tag))
    }
}
