//! Mood Routes
//!
//! - POST /api/v1/moods/query - Filtered, sorted, paginated history
//! - POST /api/v1/moods - Record a new entry

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::backend::MoodBackend;
use crate::entries::{EntryPage, FilterCriteria, MoodEntry, NewMoodEntry};

/// POST /api/v1/moods/query
pub async fn query_moods(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> ApiResult<Json<EntryPage>> {
    let page = state.store.query(&criteria).await?;
    Ok(Json(page))
}

/// POST /api/v1/moods
pub async fn create_mood(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<NewMoodEntry>,
) -> ApiResult<(StatusCode, Json<MoodEntry>)> {
    let stored = state.store.create_entry(entry).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
