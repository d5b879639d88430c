//! Mood entry model
//!
//! - **types**: `MoodEntry`, `NewMoodEntry`, the `Emotion`/`Trigger` enumerations
//! - **filter**: `FilterCriteria` and its parts (time windows, ranges, sorting)
//! - **error**: validation errors

pub mod error;
pub mod filter;
pub mod types;

pub use error::{EntryError, EntryResult};
pub use filter::{
    DateRange, EmotionFilter, FilterCriteria, IntensityFilter, SortField, SortOrder,
    TimeRangePreset, ValueRange, DEFAULT_PAGE_SIZE,
};
pub use types::{Emotion, EntryPage, MoodEntry, NewMoodEntry, Trigger, LEVEL_MAX, LEVEL_MIN};
