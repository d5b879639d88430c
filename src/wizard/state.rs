//! Wizard state
//!
//! The in-progress mood capture: which step the user is on and what has
//! been selected so far. Unset selections are `None` (emotion, trigger),
//! `0` (intensity) or empty (note).

use crate::entries::{Emotion, NewMoodEntry, Trigger};
use crate::wizard::error::{WizardError, WizardResult};
use serde::{Deserialize, Serialize};

/// Number of steps in the capture flow
pub const WIZARD_STEPS: usize = 4;

/// The steps of the capture flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Emotion,
    Intensity,
    Trigger,
    Note,
}

impl WizardStep {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(WizardStep::Emotion),
            1 => Some(WizardStep::Intensity),
            2 => Some(WizardStep::Trigger),
            3 => Some(WizardStep::Note),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Emotion => "How are you feeling?",
            WizardStep::Intensity => "How strong is it (1-10)?",
            WizardStep::Trigger => "What triggered it?",
            WizardStep::Note => "Anything else to add?",
        }
    }
}

/// Persisted wizard state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WizardState {
    /// Current step, 0-based
    pub step: usize,
    /// Chosen emotion
    pub selected_value: Option<Emotion>,
    /// Chosen intensity, 0 while unset
    pub selected_overall_number: i32,
    /// Chosen trigger
    pub selected_trigger: Option<Trigger>,
    /// Free-text note
    pub additional_note: String,
}

impl WizardState {
    /// The step the user is on, if within the flow
    pub fn current_step(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.step)
    }

    /// True when nothing has been selected and the flow is at its start
    pub fn is_pristine(&self) -> bool {
        *self == WizardState::default()
    }

    /// Build the submission payload for `user_id`
    ///
    /// Emotion and intensity are required; trigger and note are optional.
    pub fn to_new_entry(&self, user_id: &str) -> WizardResult<NewMoodEntry> {
        let emotion = self.selected_value.ok_or(WizardError::Incomplete("emotion"))?;
        if self.selected_overall_number <= 0 {
            return Err(WizardError::Incomplete("intensity"));
        }

        let note = self.additional_note.trim();

        Ok(NewMoodEntry {
            user_id: user_id.to_string(),
            emotion: emotion.label().to_string(),
            intensity: self.selected_overall_number,
            stress_level: None,
            description: (!note.is_empty()).then(|| note.to_string()),
            tags: Vec::new(),
            triggers: self
                .selected_trigger
                .map(|t| vec![t.label().to_string()])
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        let state = WizardState::default();
        assert_eq!(state.step, 0);
        assert_eq!(state.selected_value, None);
        assert_eq!(state.selected_overall_number, 0);
        assert_eq!(state.selected_trigger, None);
        assert!(state.additional_note.is_empty());
        assert!(state.is_pristine());
        assert_eq!(state.current_step(), Some(WizardStep::Emotion));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let state: WizardState = serde_json::from_str(r#"{"step":2,"selected_value":"sad"}"#).unwrap();
        assert_eq!(state.step, 2);
        assert_eq!(state.selected_value, Some(Emotion::Sad));
        assert_eq!(state.selected_overall_number, 0);
    }

    #[test]
    fn test_to_new_entry() {
        let state = WizardState {
            step: 3,
            selected_value: Some(Emotion::Anxious),
            selected_overall_number: 7,
            selected_trigger: Some(Trigger::Work),
            additional_note: "  deadline tomorrow ".to_string(),
        };

        let entry = state.to_new_entry("u1").unwrap();
        assert_eq!(entry.user_id, "u1");
        assert_eq!(entry.emotion, "Anxious");
        assert_eq!(entry.intensity, 7);
        assert_eq!(entry.triggers, vec!["Work"]);
        assert_eq!(entry.description.as_deref(), Some("deadline tomorrow"));
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_incomplete_wizard() {
        let mut state = WizardState::default();
        assert!(matches!(
            state.to_new_entry("u1"),
            Err(WizardError::Incomplete("emotion"))
        ));

        state.selected_value = Some(Emotion::Calm);
        assert!(matches!(
            state.to_new_entry("u1"),
            Err(WizardError::Incomplete("intensity"))
        ));

        state.selected_overall_number = 4;
        let entry = state.to_new_entry("u1").unwrap();
        assert!(entry.triggers.is_empty());
        assert_eq!(entry.description, None);
    }

    #[test]
    fn test_step_lookup() {
        assert_eq!(WizardStep::from_index(3), Some(WizardStep::Note));
        assert_eq!(WizardStep::from_index(WIZARD_STEPS), None);
    }
}
