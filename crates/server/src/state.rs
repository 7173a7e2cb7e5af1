// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use mediatag_autocomplete::Autocompleter;
use mediatag_db::Database;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Tag store.
    pub db: Database,
    /// Tag suggestion indexes; count changes made through the API are
    /// forwarded here.
    pub autocomplete: Autocompleter,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(db: Database, autocomplete: Autocompleter) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
            autocomplete,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
