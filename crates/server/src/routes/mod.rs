//! API route handlers for the mediatag server.

pub mod autocomplete;
pub mod health;
pub mod tags;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET    /api/health - Health check and autocomplete index status
/// - GET    /api/autocomplete - Tag suggestions (`mode=addtag|search`)
/// - POST   /api/autocomplete/rebuild - Rebuild the suggestion indexes
/// - GET    /api/tags/top - Most used tags, optionally under a directory
/// - GET    /api/files/{id}/tags - Tags on a file
/// - POST   /api/files/{id}/tags - Add a tag to a file
/// - DELETE /api/files/{id}/tags/{tag} - Remove a tag from a file
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", autocomplete::router())
        .nest("/api", tags::router())
        .with_state(state)
}
