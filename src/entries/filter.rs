//! Filter criteria for mood history queries
//!
//! `FilterCriteria` is both the request payload sent to a backend and the
//! predicate/sort/paginate pipeline a backend runs over stored entries.
//!
//! # Example
//!
//! ```rust
//! use moodwell::entries::{FilterCriteria, SortField, SortOrder, TimeRangePreset};
//!
//! let criteria = FilterCriteria::new("user-1")
//!     .emotion("Happy")
//!     .intensity_range(Some(5), None)
//!     .time_range(TimeRangePreset::Week)
//!     .sort(SortField::Intensity, SortOrder::Desc);
//!
//! assert!(criteria.validate().is_ok());
//! ```

use crate::entries::error::{EntryError, EntryResult};
use crate::entries::types::{EntryPage, MoodEntry};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Emotion criterion: a single label or any of a set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EmotionFilter {
    One(String),
    Any(Vec<String>),
}

impl EmotionFilter {
    /// Case-insensitive label match; unlabeled entries never match
    pub fn matches(&self, emotion: Option<&str>) -> bool {
        let Some(emotion) = emotion else {
            return false;
        };
        match self {
            EmotionFilter::One(label) => label.eq_ignore_ascii_case(emotion),
            EmotionFilter::Any(labels) => labels.iter().any(|l| l.eq_ignore_ascii_case(emotion)),
        }
    }
}

/// Inclusive integer range; either bound may be open
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl ValueRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    /// Missing values fall outside any range
    pub fn contains(&self, value: Option<i32>) -> bool {
        let Some(value) = value else {
            return false;
        };
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

/// Intensity criterion: exact value or range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntensityFilter {
    Exact(i32),
    Range(ValueRange),
}

impl IntensityFilter {
    pub fn matches(&self, intensity: Option<i32>) -> bool {
        match self {
            IntensityFilter::Exact(value) => intensity == Some(*value),
            IntensityFilter::Range(range) => range.contains(intensity),
        }
    }
}

/// Enumerated relative time windows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeRangePreset {
    Today,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRangePreset {
    /// Start of the window ending at `now`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRangePreset::Today => {
                let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
                Utc.from_utc_datetime(&midnight)
            }
            TimeRangePreset::Week => now - Duration::days(7),
            TimeRangePreset::Month => now - Duration::days(30),
            TimeRangePreset::Quarter => now - Duration::days(90),
            TimeRangePreset::Year => now - Duration::days(365),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        at >= self.start(now) && at <= now
    }
}

impl FromStr for TimeRangePreset {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Ok(TimeRangePreset::Today),
            "week" => Ok(TimeRangePreset::Week),
            "month" => Ok(TimeRangePreset::Month),
            "quarter" => Ok(TimeRangePreset::Quarter),
            "year" => Ok(TimeRangePreset::Year),
            _ => Err(EntryError::UnknownValue {
                kind: "time range",
                value: s.to_string(),
            }),
        }
    }
}

/// Explicit date range (half-open interval: [from, to))
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at < to)
    }
}

/// Field to sort results by
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Intensity,
    StressLevel,
    Emotion,
}

impl FromStr for SortField {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" | "createdat" | "date" => Ok(SortField::CreatedAt),
            "intensity" => Ok(SortField::Intensity),
            "stress_level" | "stresslevel" | "stress" => Ok(SortField::StressLevel),
            "emotion" => Ok(SortField::Emotion),
            _ => Err(EntryError::UnknownValue {
                kind: "sort field",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(EntryError::UnknownValue {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// Constraints applied when querying historical mood entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<IntensityFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<ValueRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRangePreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset: usize,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// Criteria for one user with no constraints and the default page size
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            emotion: None,
            intensity: None,
            stress_level: None,
            time_range: None,
            date_range: None,
            tags: Vec::new(),
            triggers: Vec::new(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn emotion(mut self, label: impl Into<String>) -> Self {
        self.emotion = Some(EmotionFilter::One(label.into()));
        self
    }

    pub fn emotions(mut self, labels: Vec<String>) -> Self {
        self.emotion = Some(EmotionFilter::Any(labels));
        self
    }

    pub fn intensity(mut self, value: i32) -> Self {
        self.intensity = Some(IntensityFilter::Exact(value));
        self
    }

    pub fn intensity_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.intensity = Some(IntensityFilter::Range(ValueRange::new(min, max)));
        self
    }

    pub fn stress_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.stress_level = Some(ValueRange::new(min, max));
        self
    }

    /// Set an enumerated window, clearing any explicit date range
    pub fn time_range(mut self, preset: TimeRangePreset) -> Self {
        self.time_range = Some(preset);
        self.date_range = None;
        self
    }

    /// Set an explicit date range, clearing any enumerated window
    pub fn date_range(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.date_range = Some(DateRange { from, to });
        self.time_range = None;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.triggers.push(trigger.into());
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    /// Reject contradictory criteria
    pub fn validate(&self) -> EntryResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(EntryError::MissingField("user_id"));
        }
        if self.time_range.is_some() && self.date_range.is_some() {
            return Err(EntryError::ConflictingTimeFilters);
        }
        if let Some(IntensityFilter::Range(range)) = &self.intensity {
            if range.is_inverted() {
                return Err(EntryError::InvertedRange("intensity"));
            }
        }
        if let Some(range) = &self.stress_level {
            if range.is_inverted() {
                return Err(EntryError::InvertedRange("stress_level"));
            }
        }
        Ok(())
    }

    /// Check if an entry satisfies every set criterion
    pub fn matches(&self, entry: &MoodEntry, now: DateTime<Utc>) -> bool {
        if entry.user_id != self.user_id {
            return false;
        }

        if let Some(emotion) = &self.emotion {
            if !emotion.matches(entry.emotion.as_deref()) {
                return false;
            }
        }

        if let Some(intensity) = &self.intensity {
            if !intensity.matches(entry.intensity) {
                return false;
            }
        }

        if let Some(stress) = &self.stress_level {
            if !stress.contains(entry.stress_level) {
                return false;
            }
        }

        if let Some(preset) = self.time_range {
            if !preset.contains(entry.created_at, now) {
                return false;
            }
        } else if let Some(range) = &self.date_range {
            if !range.contains(entry.created_at) {
                return false;
            }
        }

        // Tag and trigger sets match when the entry carries any of them
        if !self.tags.is_empty() && !overlaps(&self.tags, &entry.tags) {
            return false;
        }
        if !self.triggers.is_empty() && !overlaps(&self.triggers, &entry.triggers) {
            return false;
        }

        true
    }

    /// Filter, sort and paginate a set of entries
    pub fn apply<'a, I>(&self, entries: I, now: DateTime<Utc>) -> EntryPage
    where
        I: IntoIterator<Item = &'a MoodEntry>,
    {
        let mut matched: Vec<&MoodEntry> = entries
            .into_iter()
            .filter(|entry| self.matches(entry, now))
            .collect();

        let total = matched.len();

        matched.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let entries = matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect();

        EntryPage { entries, total }
    }

    fn compare(&self, a: &MoodEntry, b: &MoodEntry) -> Ordering {
        let primary = match self.sort_by {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Intensity => a.intensity.cmp(&b.intensity),
            SortField::StressLevel => a.stress_level.cmp(&b.stress_level),
            SortField::Emotion => {
                let left = a.emotion.as_deref().map(str::to_lowercase);
                let right = b.emotion.as_deref().map(str::to_lowercase);
                left.cmp(&right)
            }
        };
        primary.then_with(|| a.created_at.cmp(&b.created_at))
    }
}

fn overlaps(wanted: &[String], present: &[String]) -> bool {
    wanted
        .iter()
        .any(|w| present.iter().any(|p| p.eq_ignore_ascii_case(w)))
}
