//! The published pair of indexes.
//!
//! [`Indexes`] keeps both arrays behind atomically swappable references.
//! Readers load the current `Arc` and search it with no lock; the writer
//! swaps in whole new arrays (rebuild, exact-index growth) or stores single
//! counts into the current ones.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;
use mediatag_types::TagFrequency;
use serde::Serialize;

use crate::builder::{BuildStats, BuiltIndexes};
use crate::index::SortedIndex;

/// Whether a rebuild has ever been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    /// No rebuild has completed; every lookup returns nothing.
    Uninitialized,
    /// At least one rebuild has been published.
    Indexed,
}

/// Sizes of the published indexes plus figures from the last rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Entries currently in the exact index (grows between rebuilds).
    pub exact_entries: usize,
    /// Entries currently in the fragment index.
    pub fragment_entries: usize,
    pub last_build: BuildStats,
}

#[derive(Default)]
pub struct Indexes {
    exact: ArcSwapOption<SortedIndex>,
    fragments: ArcSwapOption<SortedIndex>,
    last_build: ArcSwapOption<BuildStats>,
    /// Held by every mutation; never taken by readers.
    write_lock: Mutex<()>,
}

impl Indexes {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace both indexes with freshly built ones.
    pub fn publish(&self, built: BuiltIndexes) {
        let _guard = self.lock_writes();
        self.exact.store(Some(Arc::new(built.exact)));
        self.fragments.store(Some(Arc::new(built.fragments)));
        self.last_build.store(Some(Arc::new(built.stats)));
    }

    pub fn status(&self) -> IndexStatus {
        if self.exact.load().is_some() {
            IndexStatus::Indexed
        } else {
            IndexStatus::Uninitialized
        }
    }

    pub fn stats(&self) -> Option<IndexStats> {
        let last_build = self.last_build.load_full()?;
        Some(IndexStats {
            exact_entries: self.exact.load_full().map_or(0, |i| i.len()),
            fragment_entries: self.fragments.load_full().map_or(0, |i| i.len()),
            last_build: (*last_build).clone(),
        })
    }

    /// Current exact index, if a rebuild has been published.
    pub fn exact(&self) -> Option<Arc<SortedIndex>> {
        self.exact.load_full()
    }

    /// Current fragment index, if a rebuild has been published.
    pub fn fragments(&self) -> Option<Arc<SortedIndex>> {
        self.fragments.load_full()
    }

    pub(crate) fn store_exact(&self, index: SortedIndex) {
        self.exact.store(Some(Arc::new(index)));
    }

    pub fn suggest_exact(&self, prefix: &str, limit: usize) -> Vec<TagFrequency> {
        match &*self.exact.load() {
            Some(index) => index.suggest(prefix, limit),
            None => Vec::new(),
        }
    }

    pub fn suggest_fragment(&self, prefix: &str, limit: usize) -> Vec<TagFrequency> {
        match &*self.fragments.load() {
            Some(index) => index.suggest(prefix, limit),
            None => Vec::new(),
        }
    }
}
