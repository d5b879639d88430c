//! Moodwell REST API
//!
//! HTTP API layer serving an [`EntryStore`](crate::backend::EntryStore),
//! built with Axum. [`HttpBackend`](crate::backend::HttpBackend) is its client.
//!
//! # Endpoints
//!
//! ## Moods
//! - `POST /api/v1/moods/query` - Query entries with a `FilterCriteria` body
//! - `POST /api/v1/moods` - Record a `NewMoodEntry` (201 + stored entry)
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health` - Full health status
//!
//! Errors use the body `{ "error": { "code", "message" }, "request_id" }`.
//!
//! # Example
//!
//! ```rust,no_run
//! use moodwell::api::{serve, AppState};
//! use moodwell::backend::EntryStore;
//! use moodwell::config::ApiConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(EntryStore::new());
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(store, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ApiConfig;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/moods", post(routes::moods::create_mood))
        .route("/moods/query", post(routes::moods::query_moods));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Allow the configured origins; an empty list allows any
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Moodwell API listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Moodwell API shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{EntryStore, HttpBackend, HttpBackendConfig, MoodBackend};
    use crate::entries::{EntryPage, FilterCriteria, MoodEntry, NewMoodEntry};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<EntryStore>) {
        let store = Arc::new(EntryStore::new());
        let state = AppState::new(Arc::clone(&store), ApiConfig::default());
        (build_router(state), store)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, store) = create_test_app();
        store
            .insert(MoodEntry::new("u1", "Calm").intensity(5))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["entries"], 1);
    }

    #[tokio::test]
    async fn test_create_mood() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/moods",
                r#"{"user_id": "u1", "emotion": "Happy", "intensity": 8, "triggers": ["Work"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["emotion"], "Happy");
        assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_mood_out_of_range() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/moods",
                r#"{"user_id": "u1", "emotion": "Happy", "intensity": 11}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].as_str().is_some());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_mood_invalid_json() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(post_json("/api/v1/moods", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_moods() {
        let (app, store) = create_test_app();
        store
            .insert(MoodEntry::new("u1", "Happy").intensity(8).trigger("Work"))
            .await
            .unwrap();
        store
            .insert(MoodEntry::new("u1", "Sad").intensity(4).trigger("Sleep"))
            .await
            .unwrap();
        store
            .insert(MoodEntry::new("u2", "Sad").intensity(3))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/api/v1/moods/query",
                r#"{"user_id": "u1", "emotion": "Sad", "limit": 50}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let page: EntryPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].intensity, Some(4));
    }

    #[tokio::test]
    async fn test_query_conflicting_time_filters() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/moods/query",
                r#"{"user_id": "u1", "time_range": "week", "date_range": {"from": "2024-01-01T00:00:00Z"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_http_backend_round_trip() {
        let (app, _store) = create_test_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let backend = HttpBackend::new(HttpBackendConfig {
            base_url: format!("http://{}", addr),
            request_timeout_ms: 2000,
        })
        .unwrap();
        backend.health_check().await.unwrap();

        let created = backend
            .create_entry(NewMoodEntry {
                user_id: "u1".to_string(),
                emotion: "Calm".to_string(),
                intensity: 6,
                stress_level: Some(3),
                description: Some("Quiet evening".to_string()),
                tags: vec![],
                triggers: vec!["Family".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(created.emotion.as_deref(), Some("Calm"));

        let page = backend.query(&FilterCriteria::new("u1")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].id, created.id);

        let err = backend
            .create_entry(NewMoodEntry {
                user_id: "u1".to_string(),
                emotion: "Calm".to_string(),
                intensity: 0,
                stress_level: None,
                description: None,
                tags: vec![],
                triggers: vec![],
            })
            .await
            .unwrap_err();
        match err {
            crate::backend::BackendError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("intensity"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
