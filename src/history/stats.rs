//! Statistics over a filtered entry list
//!
//! Pure derivation: recomputed whenever the list changes, never stored.

use crate::entries::MoodEntry;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Bucket for entries without an emotion label
pub const UNKNOWN_EMOTION: &str = "unknown";

/// How many triggers `top_triggers` keeps
pub const TOP_TRIGGERS: usize = 5;

/// Aggregate metrics over a set of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    /// Emotion label -> occurrences
    pub emotions: BTreeMap<String, usize>,
    /// Intensity value -> occurrences (missing intensity counts as 0)
    pub intensities: BTreeMap<i32, usize>,
    /// Mean intensity rounded to one decimal, 0 without samples
    pub average_intensity: f64,
    /// Most frequent triggers, highest count first
    pub top_triggers: Vec<(String, usize)>,
}

impl StatsSummary {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Derive statistics from `entries`
pub fn compute_stats<'a, I>(entries: I) -> StatsSummary
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let mut summary = StatsSummary::default();
    let mut intensity_sum = 0.0_f64;
    let mut intensity_samples = 0usize;
    let mut triggers = TriggerCounter::default();

    for entry in entries {
        summary.total += 1;

        let emotion = entry
            .emotion
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(UNKNOWN_EMOTION);
        *summary.emotions.entry(emotion.to_string()).or_insert(0) += 1;

        *summary
            .intensities
            .entry(entry.intensity.unwrap_or(0))
            .or_insert(0) += 1;

        if let Some(intensity) = entry.intensity {
            intensity_sum += f64::from(intensity);
            intensity_samples += 1;
        }

        for trigger in &entry.triggers {
            triggers.add(trigger);
        }
    }

    summary.average_intensity = round_one_decimal(mean(intensity_sum, intensity_samples));
    summary.top_triggers = triggers.top(TOP_TRIGGERS);
    summary
}

fn mean(sum: f64, samples: usize) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    let mean = sum / samples as f64;
    if mean.is_finite() {
        mean
    } else {
        0.0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Occurrence counter that remembers first-seen order for tie-breaking
#[derive(Default)]
struct TriggerCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl TriggerCounter {
    fn add(&mut self, trigger: &str) {
        if trigger.trim().is_empty() {
            return;
        }

        match self.index.get(trigger) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(trigger.to_string(), self.counts.len());
                self.counts.push((trigger.to_string(), 1));
            }
        }
    }

    fn top(mut self, n: usize) -> Vec<(String, usize)> {
        // Stable sort keeps first-seen order among equal counts
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}
