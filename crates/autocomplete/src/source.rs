//! Where rebuilds read tag frequencies from.

use std::future::Future;

use mediatag_db::{Database, DbResult};
use mediatag_types::TagFrequency;

/// A store that can list every live tag with its file count.
///
/// Implemented by [`Database`]; tests plug in their own.
pub trait TagSource: Send + Sync + 'static {
    /// Every tag present on at least one non-missing file through a
    /// non-deleted assignment, with the number of distinct such files.
    fn snapshot_all_tags(&self) -> impl Future<Output = DbResult<Vec<TagFrequency>>> + Send;
}

impl TagSource for Database {
    async fn snapshot_all_tags(&self) -> DbResult<Vec<TagFrequency>> {
        self.all_tags_not_missing_not_deleted().await
    }
}
