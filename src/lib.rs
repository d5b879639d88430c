//! # Moodwell
//!
//! Mood tracking core: a multi-step entry wizard that survives restarts, and
//! a history engine that filters and summarizes recorded entries.
//!
//! ## Modules
//!
//! - [`entries`]: Entry, filter and enumeration types shared by every layer
//! - [`wizard`]: Wizard state store with write-through persistence
//! - [`history`]: Filter construction, fetch lifecycle, search and statistics
//! - [`backend`]: The `MoodBackend` seam with in-process and HTTP implementations
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moodwell::backend::{EntryStore, SessionAuth};
//! use moodwell::history::{HistoryEngine, HistorySelections};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(EntryStore::new());
//!     let engine = HistoryEngine::new(backend, Arc::new(SessionAuth::signed_in("user-1")));
//!
//!     // Last 30 days, any emotion, newest first
//!     let selections = HistorySelections::default().time_range("month");
//!     engine.sync(&selections).await;
//!
//!     let view = engine.view().await;
//!     println!("{} entries, average intensity {}", view.stats.total, view.stats.average_intensity);
//! }
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod entries;
pub mod history;
pub mod logging;
pub mod wizard;

// Re-export top-level types for convenience
pub use entries::{
    Emotion, EntryError, EntryPage, FilterCriteria, MoodEntry, NewMoodEntry, Trigger,
};

pub use wizard::{
    submit, FileStore, KeyValueStore, MemoryStore, PersistError, WizardError, WizardState,
    WizardStep, WizardStore,
};

pub use history::{
    build_criteria, compute_stats, search, FetchStatus, HistoryEngine, HistorySelections,
    HistoryView, StatsSummary,
};

pub use backend::{
    AuthContext, BackendError, EntryStore, HttpBackend, HttpBackendConfig, MoodBackend,
    SessionAuth,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
