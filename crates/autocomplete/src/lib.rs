//! In-memory tag autocomplete for mediatag.
//!
//! Two sorted arrays answer suggestion queries without touching the tag
//! store: the *exact* index holds one entry per tag, the *fragment* index
//! holds the tag's suffixes so "contains" queries become prefix queries.
//! Lookups are case- and diacritic-insensitive.
//!
//! # Architecture
//!
//! - **Build**: `TagSource::snapshot_all_tags` -> [`builder::build`] -> [`Indexes::publish`]
//! - **Read path**: [`Autocompleter::suggest_exact`] / [`Autocompleter::suggest_fragment`],
//!   lock-free against the currently published arrays
//! - **Write path**: every rebuild and count delta goes through one writer
//!   task, see [`scheduler`]
//!
//! Between rebuilds the exact index can grow (new tags are inserted), the
//! fragment index cannot: a tag first seen after the last rebuild is only
//! fragment-searchable once the next rebuild has run.

pub mod builder;
pub mod entry;
pub mod fold;
pub mod fragments;
pub mod index;
pub mod indexes;
pub mod scheduler;
pub mod source;
mod updater;

pub use builder::{build, BuildStats, BuiltIndexes};
pub use entry::IndexEntry;
pub use indexes::{IndexStats, IndexStatus, Indexes};
pub use mediatag_types::TagFrequency;
pub use scheduler::{AutocompleteConfig, Autocompleter};
pub use source::TagSource;
pub use updater::ExactUpdate;

use mediatag_db::DbError;

/// Maximum number of suggestions returned by one lookup.
pub const MAX_SUGGESTIONS: usize = 20;

/// Maximum number of fragment index entries kept per distinct fragment.
pub const FRAGMENT_CAP: usize = 20;

/// Errors surfaced by the autocomplete subsystem.
///
/// Lookups never fail; only rebuilds (store reads) and talking to a stopped
/// writer do.
#[derive(Debug, thiserror::Error)]
pub enum AutocompleteError {
    #[error("Tag store error: {0}")]
    Store(#[from] DbError),

    #[error("Index build task failed: {0}")]
    BuildTask(#[from] tokio::task::JoinError),

    #[error("Autocomplete writer has stopped")]
    WriterClosed,
}
