// crates/server/src/main.rs
//! mediatag server binary.
//!
//! Opens the tag store, starts the autocomplete writer (its first index
//! build runs after the configured startup delay) and serves the API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use mediatag_autocomplete::Autocompleter;
use mediatag_db::Database;
use mediatag_server::{create_app, AppState, Cli};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,mediatag=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let db = match &cli.db {
        Some(path) => Database::new(path).await,
        None => Database::open_default().await,
    }
    .context("failed to open tag database")?;
    info!(path = %db.db_path().display(), "Tag store ready");

    let autocomplete = Autocompleter::start(db.clone(), cli.autocomplete_config());
    let state = AppState::new(db, autocomplete);
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("mediatag listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("mediatag stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
