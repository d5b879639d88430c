//! Wizard state store
//!
//! Holds the single in-progress [`WizardState`] for a device and writes it
//! through to a [`KeyValueStore`] after every mutation, so a restart resumes
//! mid-flow. The store is constructed explicitly and shared by reference
//! (or `Arc`) with whoever drives the flow.
//!
//! Mutators never fail. A persistence error is logged and the in-memory
//! state stays authoritative.

use crate::entries::{Emotion, Trigger};
use crate::wizard::persist::{KeyValueStore, PersistError};
use crate::wizard::state::{WizardState, WIZARD_STEPS};
use std::sync::RwLock;

/// Storage key the wizard state is saved under
pub const STORAGE_KEY: &str = "mood-wizard";

/// State container for the mood-entry wizard
pub struct WizardStore<S: KeyValueStore> {
    state: RwLock<WizardState>,
    persistence: S,
    key: String,
}

impl<S: KeyValueStore> WizardStore<S> {
    /// Open the store, resuming any persisted state
    pub fn open(persistence: S) -> Self {
        Self::open_with_key(persistence, STORAGE_KEY)
    }

    /// Open the store under a custom storage key
    pub fn open_with_key(persistence: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = load_state(&persistence, &key);

        Self {
            state: RwLock::new(state),
            persistence,
            key,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> WizardState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The persistence adapter in use
    pub fn persistence(&self) -> &S {
        &self.persistence
    }

    /// Jump to step `step`; sequencing is the caller's job
    pub fn set_step(&self, step: usize) {
        self.update(|state| state.step = step);
    }

    /// Advance one step, stopping at the last one
    pub fn next_step(&self) {
        self.update(|state| state.step = state.step.saturating_add(1).min(WIZARD_STEPS - 1));
    }

    /// Go back one step, stopping at the first one
    pub fn previous_step(&self) {
        self.update(|state| state.step = state.step.saturating_sub(1).min(WIZARD_STEPS - 1));
    }

    pub fn set_selected_value(&self, emotion: Emotion) {
        self.update(|state| state.selected_value = Some(emotion));
    }

    /// Set the intensity; 1-10 is expected but not enforced here
    pub fn set_selected_overall_number(&self, number: i32) {
        self.update(|state| state.selected_overall_number = number);
    }

    pub fn set_selected_trigger(&self, trigger: Trigger) {
        self.update(|state| state.selected_trigger = Some(trigger));
    }

    pub fn set_additional_note(&self, note: impl Into<String>) {
        let note = note.into();
        self.update(|state| state.additional_note = note);
    }

    /// Reset to step 0 with nothing selected
    pub fn clear_all(&self) {
        self.update(|state| *state = WizardState::default());
        tracing::debug!(key = %self.key, "Wizard state cleared");
    }

    /// Apply a mutation and persist the result under the same lock, so the
    /// stored document always matches the latest write.
    fn update(&self, mutate: impl FnOnce(&mut WizardState)) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        mutate(&mut *guard);
        self.persist(&guard);
    }

    fn persist(&self, state: &WizardState) {
        let result = serde_json::to_string(state)
            .map_err(PersistError::from)
            .and_then(|json| self.persistence.save(&self.key, &json));

        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist wizard state");
        }
    }
}

fn load_state<S: KeyValueStore>(persistence: &S, key: &str) -> WizardState {
    match persistence.load(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(state) => {
                tracing::debug!(key, "Resumed wizard state");
                state
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable wizard state");
                WizardState::default()
            }
        },
        Ok(None) => WizardState::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to load wizard state");
            WizardState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::persist::{FileStore, MemoryStore};
    use std::sync::Arc;
    use tempfile::tempdir;

    /// Adapter whose writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, PersistError> {
            Err(PersistError::InvalidKey("broken".to_string()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
            Err(PersistError::InvalidKey("broken".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), PersistError> {
            Ok(())
        }
    }

    #[test]
    fn test_mutators() {
        let store = WizardStore::open(MemoryStore::new());

        store.set_step(1);
        store.set_selected_value(Emotion::Happy);
        store.set_selected_overall_number(8);
        store.set_selected_trigger(Trigger::Work);
        store.set_additional_note("good day");

        let state = store.state();
        assert_eq!(state.step, 1);
        assert_eq!(state.selected_value, Some(Emotion::Happy));
        assert_eq!(state.selected_overall_number, 8);
        assert_eq!(state.selected_trigger, Some(Trigger::Work));
        assert_eq!(state.additional_note, "good day");
    }

    #[test]
    fn test_set_step_is_unchecked() {
        let store = WizardStore::open(MemoryStore::new());
        store.set_step(17);
        assert_eq!(store.state().step, 17);

        store.set_selected_overall_number(42);
        assert_eq!(store.state().selected_overall_number, 42);
    }

    #[test]
    fn test_next_and_previous_saturate() {
        let store = WizardStore::open(MemoryStore::new());

        store.previous_step();
        assert_eq!(store.state().step, 0);

        for _ in 0..10 {
            store.next_step();
        }
        assert_eq!(store.state().step, WIZARD_STEPS - 1);

        store.previous_step();
        assert_eq!(store.state().step, WIZARD_STEPS - 2);
    }

    #[test]
    fn test_step_navigation_from_out_of_range_step() {
        let store = WizardStore::open(MemoryStore::new());

        store.set_step(usize::MAX);
        store.next_step();
        assert_eq!(store.state().step, WIZARD_STEPS - 1);

        store.set_step(usize::MAX);
        store.previous_step();
        assert_eq!(store.state().step, WIZARD_STEPS - 1);
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let store = WizardStore::open(MemoryStore::new());
        store.set_step(3);
        store.set_selected_value(Emotion::Sad);
        store.set_selected_overall_number(4);
        store.set_selected_trigger(Trigger::Sleep);
        store.set_additional_note("tired");

        store.clear_all();

        let state = store.state();
        assert_eq!(state.step, 0);
        assert_eq!(state.selected_value, None);
        assert_eq!(state.selected_overall_number, 0);
        assert_eq!(state.selected_trigger, None);
        assert_eq!(state.additional_note, "");

        // The reset is persisted as well
        let saved = store.persistence().load(STORAGE_KEY).unwrap().unwrap();
        let saved: WizardState = serde_json::from_str(&saved).unwrap();
        assert!(saved.is_pristine());
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let backing = Arc::new(MemoryStore::new());
        let store = WizardStore::open(Arc::clone(&backing));

        store.set_selected_value(Emotion::Calm);
        let saved: WizardState =
            serde_json::from_str(&backing.load(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.selected_value, Some(Emotion::Calm));

        store.set_step(2);
        let saved: WizardState =
            serde_json::from_str(&backing.load(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.step, 2);
    }

    #[test]
    fn test_resume_after_restart() {
        let dir = tempdir().unwrap();

        {
            let store = WizardStore::open(FileStore::new(dir.path()));
            store.set_step(2);
            store.set_selected_value(Emotion::Tired);
            store.set_selected_overall_number(6);
        }

        let store = WizardStore::open(FileStore::new(dir.path()));
        let state = store.state();
        assert_eq!(state.step, 2);
        assert_eq!(state.selected_value, Some(Emotion::Tired));
        assert_eq!(state.selected_overall_number, 6);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_default() {
        let backing = MemoryStore::new();
        backing.save(STORAGE_KEY, "{not json").unwrap();

        let store = WizardStore::open(backing);
        assert!(store.state().is_pristine());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let store = WizardStore::open(BrokenStore);
        assert!(store.state().is_pristine());

        store.set_selected_value(Emotion::Angry);
        assert_eq!(store.state().selected_value, Some(Emotion::Angry));
    }

    #[test]
    fn test_last_write_wins_across_threads() {
        let store = Arc::new(WizardStore::open(MemoryStore::new()));

        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.set_selected_overall_number(n))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let in_memory = store.state().selected_overall_number;
        let saved: WizardState =
            serde_json::from_str(&store.persistence().load(STORAGE_KEY).unwrap().unwrap())
                .unwrap();
        assert!((1..=8).contains(&in_memory));
        assert_eq!(saved.selected_overall_number, in_memory);
    }
}
