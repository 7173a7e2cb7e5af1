// crates/server/src/config.rs
//! Command-line and environment configuration for the server binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mediatag_autocomplete::AutocompleteConfig;

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 8192;

#[derive(Parser, Debug, Clone)]
#[command(name = "mediatag", version, about = "Tagged media server")]
pub struct Cli {
    /// Port to listen on (falls back to `PORT`, then 8192)
    #[arg(long, env = "MEDIATAG_PORT")]
    pub port: Option<u16>,

    /// SQLite database file (defaults to the user cache directory)
    #[arg(long, env = "MEDIATAG_DB")]
    pub db: Option<PathBuf>,

    /// Seconds to wait after startup before building the autocomplete index
    #[arg(long, env = "MEDIATAG_AUTOCOMPLETE_DELAY_SECS", default_value_t = 60)]
    pub autocomplete_delay_secs: u64,
}

impl Cli {
    pub fn port(&self) -> u16 {
        self.port
            .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn autocomplete_config(&self) -> AutocompleteConfig {
        AutocompleteConfig {
            startup_delay: Duration::from_secs(self.autocomplete_delay_secs),
            ..AutocompleteConfig::default()
        }
    }
}
