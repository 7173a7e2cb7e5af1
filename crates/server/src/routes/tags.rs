// crates/server/src/routes/tags.rs
//! Tag store endpoints.
//!
//! Adding or removing a tag updates the store first; the suggestion
//! indexes only see the change when the file actually gained or lost it.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use mediatag_db::{Tag, TagFrequency};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_TOP_LIMIT: u32 = 100;
const MAX_TOP_LIMIT: u32 = 1000;

/// Query parameters for GET /api/tags/top.
#[derive(Debug, Deserialize)]
pub struct TopTagsQuery {
    /// Only count files under this directory.
    pub path: Option<String>,
    pub limit: Option<u32>,
}

/// Body for POST /api/files/{id}/tags.
#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    pub tag: String,
    #[serde(default)]
    pub cls: String,
}

/// Query parameters for DELETE /api/files/{id}/tags/{tag}.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveTagQuery {
    #[serde(default)]
    pub cls: String,
}

/// Query parameters for GET /api/files/{id}/tags.
#[derive(Debug, Default, Deserialize)]
pub struct FileTagsQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct TagChangeResponse {
    pub file_id: String,
    pub tag: String,
    pub cls: String,
    /// Whether the file's set of live tags changed.
    pub changed: bool,
}

/// GET /api/tags/top - Most used tags, optionally under a directory.
pub async fn top_tags(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopTagsQuery>,
) -> ApiResult<Json<Vec<TagFrequency>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TOP_LIMIT)
        .clamp(1, MAX_TOP_LIMIT);
    let path = query.path.as_deref().filter(|p| !p.is_empty());
    let tags = state.db.top_tags(path, limit).await?;
    Ok(Json(tags))
}

/// GET /api/files/{id}/tags - Tags attached to one file.
pub async fn file_tags(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    Query(query): Query<FileTagsQuery>,
) -> ApiResult<Json<Vec<Tag>>> {
    ensure_file(&state, &file_id).await?;
    let tags = state
        .db
        .tags_for_file(&file_id, query.include_deleted)
        .await?;
    Ok(Json(tags))
}

/// POST /api/files/{id}/tags - Attach a tag to a file.
pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    Json(body): Json<AddTagRequest>,
) -> ApiResult<Json<TagChangeResponse>> {
    let tag = body.tag.trim();
    if tag.is_empty() {
        return Err(ApiError::BadRequest("Tag must not be blank.".to_string()));
    }
    ensure_file(&state, &file_id).await?;

    let changed = state.db.add_tag(&file_id, tag, &body.cls).await?;
    if changed {
        state.autocomplete.increment_tag(tag)?;
    }
    tracing::debug!(file_id = %file_id, tag, changed, "Tag added");

    Ok(Json(TagChangeResponse {
        file_id,
        tag: tag.to_string(),
        cls: body.cls,
        changed,
    }))
}

/// DELETE /api/files/{id}/tags/{tag} - Detach a tag from a file.
pub async fn remove_tag(
    State(state): State<Arc<AppState>>,
    Path((file_id, tag)): Path<(String, String)>,
    Query(query): Query<RemoveTagQuery>,
) -> ApiResult<Json<TagChangeResponse>> {
    ensure_file(&state, &file_id).await?;

    let changed = state.db.remove_tag(&file_id, &tag, &query.cls).await?;
    if changed {
        state.autocomplete.decrement_tag(&tag)?;
    }
    tracing::debug!(file_id = %file_id, tag = %tag, changed, "Tag removed");

    Ok(Json(TagChangeResponse {
        file_id,
        tag,
        cls: query.cls,
        changed,
    }))
}

async fn ensure_file(state: &AppState, file_id: &str) -> ApiResult<()> {
    match state.db.file_path(file_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::FileNotFound(file_id.to_string())),
    }
}

/// Create the tag routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags/top", get(top_tags))
        .route("/files/{id}/tags", get(file_tags).post(add_tag))
        .route("/files/{id}/tags/{tag}", delete(remove_tag))
}
