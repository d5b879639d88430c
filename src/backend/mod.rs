//! History backend
//!
//! The engine and wizard talk to a backend only through [`MoodBackend`]:
//!
//! - **http**: `HttpBackend`, a REST client for a remote moodwell API
//! - **memory**: `EntryStore`, an in-process store with optional JSON snapshots
//!
//! [`AuthContext`] supplies the current user's id; without one, nothing is
//! fetched or submitted.

mod http;
mod memory;

pub use http::{HttpBackend, HttpBackendConfig};
pub use memory::EntryStore;

use crate::entries::{EntryError, EntryPage, FilterCriteria, MoodEntry, NewMoodEntry};
use async_trait::async_trait;
use std::sync::RwLock;
use thiserror::Error;

/// Backend query interface
#[async_trait]
pub trait MoodBackend: Send + Sync {
    /// Fetch one page of entries matching the criteria
    async fn query(&self, criteria: &FilterCriteria) -> BackendResult<EntryPage>;

    /// Record a new entry and return it as stored
    async fn create_entry(&self, entry: NewMoodEntry) -> BackendResult<MoodEntry>;
}

/// Source of the current user's identifier
pub trait AuthContext: Send + Sync {
    fn user_id(&self) -> Option<String>;
}

/// Auth context backed by a mutable session slot
#[derive(Debug, Default)]
pub struct SessionAuth {
    user_id: RwLock<Option<String>>,
}

impl SessionAuth {
    /// A session with no signed-in user
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session already signed in as `user_id`
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.into())),
        }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let mut guard = self.user_id.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(user_id.into());
    }

    pub fn sign_out(&self) {
        let mut guard = self.user_id.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl AuthContext for SessionAuth {
    fn user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Errors surfaced by a backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Criteria or entry rejected before reaching storage
    #[error("Invalid request: {0}")]
    Invalid(#[from] EntryError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Storage(err.to_string())
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
