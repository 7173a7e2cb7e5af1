// crates/types/src/lib.rs
//! Value types shared between the tag store, the autocomplete index and the
//! HTTP layer.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A distinct tag and the number of live files carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagFrequency {
    pub tag: String,
    pub count: u64,
}

impl TagFrequency {
    pub fn new(tag: impl Into<String>, count: u64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }

    /// Ranking order used for every suggestion list: most used first,
    /// then tag text ascending.
    pub fn cmp_by_count_desc(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.tag.cmp(&other.tag))
    }

    /// Copy of this frequency with `prefix` prepended to the tag text.
    pub fn with_tag_prefix(&self, prefix: &str) -> Self {
        Self {
            tag: format!("{prefix}{}", self.tag),
            count: self.count,
        }
    }
}

/// One tag row attached to a file, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    /// Optional classification namespace; empty when unclassified.
    pub cls: String,
    /// Unix millis of the last change to this row.
    pub modified: i64,
    pub deleted: bool,
}
