//! Mood history
//!
//! Turns history-screen selections into backend queries, tracks the fetch
//! lifecycle and derives statistics from what was fetched.
//!
//! - **selection**: raw dropdown values and `build_criteria`
//! - **engine**: `HistoryEngine`, the fetch lifecycle with supersede-by-latest
//! - **search**: client-side free-text narrowing
//! - **stats**: `compute_stats` over the narrowed list

mod engine;
mod search;
mod selection;
mod stats;

pub use engine::{FetchOutcome, FetchStatus, HistoryEngine, HistoryView, LOAD_ERROR_MESSAGE};
pub use search::search;
pub use selection::{build_criteria, build_criteria_with_limit, FetchKey, HistorySelections, ALL};
pub use stats::{compute_stats, StatsSummary, TOP_TRIGGERS, UNKNOWN_EMOTION};
