//! History fetch engine
//!
//! Owns one filter/result pair for a history screen and runs the fetch
//! lifecycle against a [`MoodBackend`]:
//!
//! ```text
//! selections ─► fetch key changed? ─► Loading ─► backend.query ─► Success | Error
//!                      │ no                                  │
//!                      └─► only the search term is updated    └─► applied only if still
//!                                                                 the latest fetch and the
//!                                                                 engine is not closed
//! ```
//!
//! Every fetch takes a generation number. A response is applied only while
//! its generation is current (supersede-by-latest) and the engine has not
//! been closed (ignore-late-response). No retries and no caching.

use crate::backend::{AuthContext, MoodBackend};
use crate::entries::{EntryPage, FilterCriteria, MoodEntry, DEFAULT_PAGE_SIZE};
use crate::history::search::search;
use crate::history::selection::{build_criteria_with_limit, FetchKey, HistorySelections};
use crate::history::stats::{compute_stats, StatsSummary};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Message shown to the user when a fetch fails
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load mood history. Please try again.";

/// Lifecycle of the current fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What happened to a requested fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Entries were stored
    Loaded,
    /// The backend failed; the error message was stored
    Failed,
    /// A newer fetch started before this one returned; result dropped
    Superseded,
    /// The engine was closed; result dropped or fetch not started
    Closed,
    /// No user id available; nothing fetched
    NotSignedIn,
    /// Fetch-relevant selections did not change; nothing fetched
    Unchanged,
}

/// Snapshot for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub status: FetchStatus,
    /// Fetched entries with the search term applied
    pub entries: Vec<MoodEntry>,
    /// Matching entries on the backend, before pagination and search
    pub total: usize,
    /// Statistics over `entries`
    pub stats: StatsSummary,
    pub error: Option<String>,
}

struct EngineState {
    generation: u64,
    closed: bool,
    key: Option<FetchKey>,
    criteria: Option<FilterCriteria>,
    search: String,
    status: FetchStatus,
    page: EntryPage,
    error: Option<String>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            generation: 0,
            closed: false,
            key: None,
            criteria: None,
            search: String::new(),
            status: FetchStatus::Idle,
            page: EntryPage::default(),
            error: None,
        }
    }

    /// Start a new fetch cycle, invalidating any in flight
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        self.generation
    }

    /// Forget the signed-out user's results and drop any fetch in flight
    fn sign_out(&mut self) {
        if self.key.is_some() || self.status != FetchStatus::Idle {
            tracing::debug!(generation = self.generation, "Clearing history after sign-out");
        }
        self.generation += 1;
        self.key = None;
        self.criteria = None;
        self.status = FetchStatus::Idle;
        self.page = EntryPage::default();
        self.error = None;
    }
}

/// Filter, fetch and summarize mood history for one consumer
pub struct HistoryEngine<B: MoodBackend + ?Sized> {
    backend: Arc<B>,
    auth: Arc<dyn AuthContext>,
    page_size: usize,
    state: Arc<Mutex<EngineState>>,
}

impl<B: MoodBackend + ?Sized> Clone for HistoryEngine<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            auth: Arc::clone(&self.auth),
            page_size: self.page_size,
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: MoodBackend + ?Sized> HistoryEngine<B> {
    pub fn new(backend: Arc<B>, auth: Arc<dyn AuthContext>) -> Self {
        Self::with_page_size(backend, auth, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(backend: Arc<B>, auth: Arc<dyn AuthContext>, page_size: usize) -> Self {
        Self {
            backend,
            auth,
            page_size,
            state: Arc::new(Mutex::new(EngineState::new())),
        }
    }

    /// Apply the latest selections
    ///
    /// Updates the search term, and fetches once if any fetch-relevant
    /// selection (or the user) changed since the last fetch.
    pub async fn sync(&self, selections: &HistorySelections) -> FetchOutcome {
        let (generation, criteria) = {
            let mut state = self.state.lock().await;
            if state.closed {
                return FetchOutcome::Closed;
            }
            state.search = selections.search.clone();

            let Some(user_id) = self.auth.user_id() else {
                state.sign_out();
                return FetchOutcome::NotSignedIn;
            };

            let key = selections.fetch_key(&user_id);
            if state.key.as_ref() == Some(&key) {
                return FetchOutcome::Unchanged;
            }

            let criteria = build_criteria_with_limit(&user_id, selections, self.page_size);
            state.key = Some(key);
            state.criteria = Some(criteria.clone());
            (state.begin(), criteria)
        };

        self.fetch(generation, criteria).await
    }

    /// Re-run the last fetch (manual retry)
    pub async fn refetch(&self) -> FetchOutcome {
        let (generation, criteria) = {
            let mut state = self.state.lock().await;
            if state.closed {
                return FetchOutcome::Closed;
            }
            if self.auth.user_id().is_none() {
                state.sign_out();
                return FetchOutcome::NotSignedIn;
            }
            let Some(criteria) = state.criteria.clone() else {
                return FetchOutcome::Unchanged;
            };
            (state.begin(), criteria)
        };

        self.fetch(generation, criteria).await
    }

    /// Change only the client-side search term
    pub async fn set_search(&self, term: impl Into<String>) {
        self.state.lock().await.search = term.into();
    }

    /// Tear down: any response arriving afterwards is ignored
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.closed = true;
        tracing::debug!(generation = state.generation, "History engine closed");
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    pub async fn status(&self) -> FetchStatus {
        self.state.lock().await.status
    }

    /// The payload of the most recent fetch
    pub async fn criteria(&self) -> Option<FilterCriteria> {
        self.state.lock().await.criteria.clone()
    }

    /// Current entries (search applied) and their statistics
    pub async fn view(&self) -> HistoryView {
        let state = self.state.lock().await;
        let filtered = search(&state.page.entries, &state.search);
        let stats = compute_stats(filtered.iter().copied());

        HistoryView {
            status: state.status,
            entries: filtered.into_iter().cloned().collect(),
            total: state.page.total,
            stats,
            error: state.error.clone(),
        }
    }

    async fn fetch(&self, generation: u64, criteria: FilterCriteria) -> FetchOutcome {
        tracing::debug!(generation, user_id = %criteria.user_id, "Fetching mood history");

        // The lock is not held across the backend call
        let result = self.backend.query(&criteria).await;

        let mut state = self.state.lock().await;
        if state.closed {
            tracing::debug!(generation, "Discarding history response after close");
            return FetchOutcome::Closed;
        }
        if state.generation != generation {
            tracing::debug!(
                generation,
                latest = state.generation,
                "Discarding superseded history response"
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                tracing::debug!(generation, total = page.total, "Mood history loaded");
                state.page = page;
                state.error = None;
                state.status = FetchStatus::Success;
                FetchOutcome::Loaded
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %criteria.user_id, "Failed to load mood history");
                state.page = EntryPage::default();
                state.error = Some(LOAD_ERROR_MESSAGE.to_string());
                state.status = FetchStatus::Error;
                FetchOutcome::Failed
            }
        }
    }
}
