//! REST client for a remote moodwell API
//!
//! Talks to the endpoints served by [`crate::api`]:
//! - `POST /api/v1/moods/query`
//! - `POST /api/v1/moods`
//! - `GET /health/live`

use crate::backend::{BackendError, BackendResult, MoodBackend};
use crate::entries::{EntryPage, FilterCriteria, MoodEntry, NewMoodEntry};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

/// Configuration for the HTTP backend
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the API (e.g., "http://localhost:8086")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8086".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// HTTP implementation of [`MoodBackend`]
pub struct HttpBackend {
    client: Client,
    config: HttpBackendConfig,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Check if the API is reachable
    pub async fn health_check(&self) -> BackendResult<()> {
        let response = self
            .client
            .get(self.url("/health/live"))
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }
}

#[async_trait]
impl MoodBackend for HttpBackend {
    async fn query(&self, criteria: &FilterCriteria) -> BackendResult<EntryPage> {
        tracing::debug!(user_id = %criteria.user_id, "Querying mood history");

        let response = self
            .client
            .post(self.url("/api/v1/moods/query"))
            .json(criteria)
            .send()
            .await
            .map_err(classify)?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn create_entry(&self, entry: NewMoodEntry) -> BackendResult<MoodEntry> {
        let response = self
            .client
            .post(self.url("/api/v1/moods"))
            .json(&entry)
            .send()
            .await
            .map_err(classify)?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

fn classify(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else if err.is_connect() {
        BackendError::Unavailable
    } else {
        BackendError::Request(err)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(text);

    Err(BackendError::ApiError {
        status: status.as_u16(),
        message,
    })
}
