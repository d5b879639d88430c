//! Core data types for mood entries
//!
//! - `MoodEntry`: one recorded emotional-state observation, as fetched
//! - `NewMoodEntry`: the payload a finished wizard submits
//! - `Emotion` and `Trigger`: the fixed enumerations the wizard offers
//! - `EntryPage`: a page of query results plus the total match count

use crate::entries::error::{EntryError, EntryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Lowest accepted intensity / stress level
pub const LEVEL_MIN: i32 = 1;
/// Highest accepted intensity / stress level
pub const LEVEL_MAX: i32 = 10;

/// A single recorded mood observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    /// Backend-assigned identifier
    pub id: String,
    /// Owner of the entry
    #[serde(default)]
    pub user_id: String,
    /// Emotion label (e.g. "Happy"); may be missing on legacy records
    #[serde(default)]
    pub emotion: Option<String>,
    /// Intensity, 1-10
    #[serde(default, deserialize_with = "lenient_level")]
    pub intensity: Option<i32>,
    /// Stress level, 1-10
    #[serde(default, deserialize_with = "lenient_level")]
    pub stress_level: Option<i32>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub triggers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Create an entry with a fresh id and the current timestamp
    pub fn new(user_id: impl Into<String>, emotion: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            emotion: Some(emotion.into()),
            intensity: None,
            stress_level: None,
            description: None,
            tags: Vec::new(),
            triggers: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder method: set intensity
    pub fn intensity(mut self, intensity: i32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Builder method: set stress level
    pub fn stress_level(mut self, level: i32) -> Self {
        self.stress_level = Some(level);
        self
    }

    /// Builder method: set description
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Builder method: add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder method: add a trigger
    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.triggers.push(trigger.into());
        self
    }

    /// Builder method: set creation time
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}

/// Payload for recording a new entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMoodEntry {
    pub user_id: String,
    pub emotion: String,
    pub intensity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,
}

impl NewMoodEntry {
    /// Check required fields and level ranges
    pub fn validate(&self) -> EntryResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(EntryError::MissingField("user_id"));
        }
        if self.emotion.trim().is_empty() {
            return Err(EntryError::MissingField("emotion"));
        }
        check_level("intensity", self.intensity)?;
        if let Some(stress) = self.stress_level {
            check_level("stress_level", stress)?;
        }
        Ok(())
    }

    /// Materialize into a stored entry
    pub fn into_entry(self, id: String, created_at: DateTime<Utc>) -> MoodEntry {
        MoodEntry {
            id,
            user_id: self.user_id,
            emotion: Some(self.emotion),
            intensity: Some(self.intensity),
            stress_level: self.stress_level,
            description: self.description.filter(|d| !d.trim().is_empty()),
            tags: self.tags,
            triggers: self.triggers,
            created_at,
        }
    }
}

fn check_level(field: &'static str, value: i32) -> EntryResult<()> {
    if (LEVEL_MIN..=LEVEL_MAX).contains(&value) {
        Ok(())
    } else {
        Err(EntryError::OutOfRange {
            field,
            value,
            min: LEVEL_MIN,
            max: LEVEL_MAX,
        })
    }
}

/// A page of query results
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntryPage {
    pub entries: Vec<MoodEntry>,
    /// Number of matching entries before pagination
    pub total: usize,
}

/// Emotions offered by the entry wizard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Calm,
    Excited,
    Grateful,
    Neutral,
    Tired,
    Anxious,
    Stressed,
    Sad,
    Angry,
}

impl Emotion {
    /// Get all emotions for iteration
    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::Happy,
            Emotion::Calm,
            Emotion::Excited,
            Emotion::Grateful,
            Emotion::Neutral,
            Emotion::Tired,
            Emotion::Anxious,
            Emotion::Stressed,
            Emotion::Sad,
            Emotion::Angry,
        ]
    }

    /// Label stored on entries
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Calm => "Calm",
            Emotion::Excited => "Excited",
            Emotion::Grateful => "Grateful",
            Emotion::Neutral => "Neutral",
            Emotion::Tired => "Tired",
            Emotion::Anxious => "Anxious",
            Emotion::Stressed => "Stressed",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Emotion {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Emotion::all()
            .iter()
            .copied()
            .find(|e| e.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EntryError::UnknownValue {
                kind: "emotion",
                value: s.to_string(),
            })
    }
}

/// Triggers offered by the entry wizard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Work,
    Family,
    Relationships,
    Health,
    Sleep,
    Money,
    Social,
    Weather,
    Other,
}

impl Trigger {
    pub fn all() -> &'static [Trigger] {
        &[
            Trigger::Work,
            Trigger::Family,
            Trigger::Relationships,
            Trigger::Health,
            Trigger::Sleep,
            Trigger::Money,
            Trigger::Social,
            Trigger::Weather,
            Trigger::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trigger::Work => "Work",
            Trigger::Family => "Family",
            Trigger::Relationships => "Relationships",
            Trigger::Health => "Health",
            Trigger::Sleep => "Sleep",
            Trigger::Money => "Money",
            Trigger::Social => "Social",
            Trigger::Weather => "Weather",
            Trigger::Other => "Other",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Trigger {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Trigger::all()
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EntryError::UnknownValue {
                kind: "trigger",
                value: s.to_string(),
            })
    }
}

/// Accept integers, finite floats (rounded) and numeric strings; anything
/// else (null, NaN, garbage) becomes `None`.
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(level_from_value))
}

fn level_from_value(value: &Value) -> Option<i32> {
    let float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).ok();
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if float.is_finite() && float.abs() <= i32::MAX as f64 {
        Some(float.round() as i32)
    } else {
        None
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
