//! UI selections and filter construction
//!
//! The history screen exposes five independent dropdowns plus a search box.
//! Selections arrive as raw strings; `"all"` (or an empty value) means the
//! criterion is omitted.

use crate::entries::{FilterCriteria, SortField, SortOrder, TimeRangePreset, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Sentinel selection value meaning "do not filter on this"
pub const ALL: &str = "all";

/// Raw selections from the history screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySelections {
    pub emotion: String,
    pub intensity: String,
    pub time_range: String,
    pub sort_by: String,
    pub sort_order: String,
    /// Applied client-side after the fetch
    pub search: String,
}

impl Default for HistorySelections {
    fn default() -> Self {
        Self {
            emotion: ALL.to_string(),
            intensity: ALL.to_string(),
            time_range: ALL.to_string(),
            sort_by: "created_at".to_string(),
            sort_order: "desc".to_string(),
            search: String::new(),
        }
    }
}

impl HistorySelections {
    pub fn emotion(mut self, value: impl Into<String>) -> Self {
        self.emotion = value.into();
        self
    }

    pub fn intensity(mut self, value: impl Into<String>) -> Self {
        self.intensity = value.into();
        self
    }

    pub fn time_range(mut self, value: impl Into<String>) -> Self {
        self.time_range = value.into();
        self
    }

    pub fn sort_by(mut self, value: impl Into<String>) -> Self {
        self.sort_by = value.into();
        self
    }

    pub fn sort_order(mut self, value: impl Into<String>) -> Self {
        self.sort_order = value.into();
        self
    }

    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = value.into();
        self
    }

    /// The selections a fetch depends on (everything except the search term)
    pub fn fetch_key(&self, user_id: &str) -> FetchKey {
        FetchKey {
            user_id: user_id.to_string(),
            emotion: self.emotion.clone(),
            intensity: self.intensity.clone(),
            time_range: self.time_range.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
        }
    }
}

/// Identity of a fetch: a change in any field requires a new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey {
    pub user_id: String,
    pub emotion: String,
    pub intensity: String,
    pub time_range: String,
    pub sort_by: String,
    pub sort_order: String,
}

fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Build the backend payload for `user_id` from raw selections
///
/// Unparseable intensity or time-range values omit their criterion;
/// unparseable sort values fall back to newest first.
pub fn build_criteria(user_id: &str, selections: &HistorySelections) -> FilterCriteria {
    build_criteria_with_limit(user_id, selections, DEFAULT_PAGE_SIZE)
}

/// [`build_criteria`] with an explicit page size
pub fn build_criteria_with_limit(
    user_id: &str,
    selections: &HistorySelections,
    limit: usize,
) -> FilterCriteria {
    let mut criteria = FilterCriteria::new(user_id).page(limit, 0);

    if !is_all(&selections.emotion) {
        criteria = criteria.emotion(selections.emotion.trim());
    }

    if !is_all(&selections.intensity) {
        match selections.intensity.trim().parse::<i32>() {
            Ok(value) => criteria = criteria.intensity(value),
            Err(_) => {
                tracing::debug!(value = %selections.intensity, "Ignoring non-numeric intensity selection");
            }
        }
    }

    if !is_all(&selections.time_range) {
        match selections.time_range.parse::<TimeRangePreset>() {
            Ok(preset) => criteria = criteria.time_range(preset),
            Err(e) => tracing::debug!(error = %e, "Ignoring time range selection"),
        }
    }

    let sort_by = selections.sort_by.parse::<SortField>().unwrap_or_default();
    let sort_order = selections.sort_order.parse::<SortOrder>().unwrap_or_default();

    criteria.sort(sort_by, sort_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{EmotionFilter, IntensityFilter};

    #[test]
    fn test_all_selections_omit_criteria() {
        let criteria = build_criteria("u1", &HistorySelections::default());

        assert_eq!(criteria.user_id, "u1");
        assert_eq!(criteria.limit, 50);
        assert_eq!(criteria.offset, 0);
        assert_eq!(criteria.emotion, None);
        assert_eq!(criteria.intensity, None);
        assert_eq!(criteria.time_range, None);
        assert_eq!(criteria.sort_by, SortField::CreatedAt);
        assert_eq!(criteria.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_concrete_selections() {
        let selections = HistorySelections::default()
            .emotion("Happy")
            .intensity("7")
            .time_range("month")
            .sort_by("intensity")
            .sort_order("asc");
        let criteria = build_criteria("u1", &selections);

        assert_eq!(criteria.emotion, Some(EmotionFilter::One("Happy".into())));
        assert_eq!(criteria.intensity, Some(IntensityFilter::Exact(7)));
        assert_eq!(criteria.time_range, Some(TimeRangePreset::Month));
        assert_eq!(criteria.sort_by, SortField::Intensity);
        assert_eq!(criteria.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_non_numeric_intensity_is_omitted() {
        let selections = HistorySelections::default().intensity("very");
        let criteria = build_criteria("u1", &selections);
        assert_eq!(criteria.intensity, None);

        let payload = serde_json::to_value(&criteria).unwrap();
        assert!(payload.get("intensity").is_none());
    }

    #[test]
    fn test_unknown_time_range_and_sort_fall_back() {
        let selections = HistorySelections::default()
            .time_range("fortnight")
            .sort_by("mood")
            .sort_order("sideways");
        let criteria = build_criteria("u1", &selections);

        assert_eq!(criteria.time_range, None);
        assert_eq!(criteria.sort_by, SortField::CreatedAt);
        assert_eq!(criteria.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_fetch_key_ignores_search() {
        let a = HistorySelections::default().search("work");
        let b = HistorySelections::default().search("sleep");
        assert_eq!(a.fetch_key("u1"), b.fetch_key("u1"));

        let c = HistorySelections::default().emotion("Sad");
        assert_ne!(a.fetch_key("u1"), c.fetch_key("u1"));
        assert_ne!(a.fetch_key("u1"), a.fetch_key("u2"));
    }

    #[test]
    fn test_custom_page_size() {
        let criteria = build_criteria_with_limit("u1", &HistorySelections::default(), 20);
        assert_eq!(criteria.limit, 20);
    }
}
