//! Moodwell API Server
//!
//! Run with: cargo run --bin moodwell-api
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (see `moodwell config`).
//! Environment variables override it:
//! - `MOODWELL_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `MOODWELL_API_PORT`: Port to listen on (default: 8086)
//! - `MOODWELL_DATA_DIR`: Directory for the entry snapshot
//! - `MOODWELL_LOG_LEVEL` / `MOODWELL_LOG_FORMAT`
//! - `RUST_LOG`: Overrides the log level entirely

use anyhow::Context;
use moodwell::api::{serve, AppState};
use moodwell::backend::EntryStore;
use moodwell::config::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    moodwell::logging::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!("Starting Moodwell API server v{}", env!("CARGO_PKG_VERSION"));

    let store = match config.storage.snapshot_path() {
        Some(path) => {
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("Failed to create data directory {:?}", dir))?;
            }
            tracing::info!("Entry snapshot: {:?}", path);
            EntryStore::open(&path)
                .await
                .with_context(|| format!("Failed to open entry snapshot {:?}", path))?
        }
        None => {
            tracing::info!("Entry snapshot disabled; entries live in memory only");
            EntryStore::new()
        }
    };
    tracing::info!("Loaded {} entries", store.len().await);

    let state = AppState::new(Arc::new(store), config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Moodwell API server stopped");
    Ok(())
}
