//! Full construction of both indexes from a tag snapshot.

use std::sync::Arc;
use std::time::Instant;

use mediatag_types::TagFrequency;
use serde::Serialize;
use tracing::info;

use crate::entry::IndexSlot;
use crate::fragments::fragment_slots;
use crate::index::SortedIndex;

/// Figures from one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Tags in the snapshot (= exact index entries).
    pub tags: usize,
    /// Fragments generated before capping.
    pub fragments_generated: usize,
    /// Fragments kept after capping.
    pub fragments_kept: usize,
    pub elapsed_ms: u64,
}

/// Freshly built, not yet published, indexes.
#[derive(Debug)]
pub struct BuiltIndexes {
    pub exact: SortedIndex,
    pub fragments: SortedIndex,
    pub stats: BuildStats,
}

/// Build the exact and fragment indexes for `snapshot`.
///
/// The fragment index keeps at most `fragment_cap` entries per distinct
/// fragment string, preferring the highest counts. The cap counts exact
/// (case-sensitive) fragment strings.
pub fn build(snapshot: &[TagFrequency], fragment_cap: usize) -> BuiltIndexes {
    let started = Instant::now();

    let exact = build_exact(snapshot);
    info!(tags = exact.len(), "exact tag index built");

    let (fragments, generated) = build_fragments(snapshot, fragment_cap);
    info!(
        generated,
        kept = fragments.len(),
        cap = fragment_cap,
        "fragment index built"
    );

    let stats = BuildStats {
        tags: exact.len(),
        fragments_generated: generated,
        fragments_kept: fragments.len(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    BuiltIndexes {
        exact,
        fragments,
        stats,
    }
}

fn build_exact(snapshot: &[TagFrequency]) -> SortedIndex {
    // The store sorts by its own collation; re-sort so the array matches
    // what lookups assume.
    let slots = snapshot
        .iter()
        .map(|tf| {
            let tag: Arc<str> = Arc::from(tf.tag.as_str());
            IndexSlot::new(Arc::clone(&tag), tag, tf.count)
        })
        .collect();
    SortedIndex::from_unsorted(slots)
}

/// Returns the capped index and how many fragments were generated before
/// capping.
fn build_fragments(snapshot: &[TagFrequency], cap: usize) -> (SortedIndex, usize) {
    let mut slots = Vec::new();
    for tf in snapshot {
        let tag: Arc<str> = Arc::from(tf.tag.as_str());
        slots.extend(fragment_slots(&tag, tf.count));
    }
    let generated = slots.len();

    let sorted = SortedIndex::from_unsorted(slots);
    (cap_per_key(sorted, cap), generated)
}

/// Keep the first `cap` slots of every run of equal keys.
///
/// Equal keys are adjacent in index order, highest count first.
fn cap_per_key(sorted: SortedIndex, cap: usize) -> SortedIndex {
    let mut slots = sorted.into_slots();
    let mut run = 0usize;
    let mut prev_key: Option<Arc<str>> = None;
    slots.retain(|slot| {
        let same_key = prev_key.as_ref().is_some_and(|prev| *prev == slot.key);
        run = if same_key { run + 1 } else { 1 };
        if !same_key {
            prev_key = Some(Arc::clone(&slot.key));
        }
        run <= cap
    });
    slots.shrink_to_fit();
    SortedIndex::from_sorted(slots)
}
