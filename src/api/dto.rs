//! Data Transfer Objects
//!
//! Mood requests and responses reuse the `entries` types directly; only the
//! health payload is API-specific.

use serde::{Deserialize, Serialize};

/// Full health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Entries held by the store
    pub entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
