//! Mood-entry wizard
//!
//! The multi-step capture flow: emotion, intensity, trigger, note.
//!
//! - **state**: `WizardState` and the step enumeration
//! - **store**: `WizardStore`, the write-through state container
//! - **persist**: key-value persistence adapters (`FileStore`, `MemoryStore`)
//! - **submit**: turn a finished wizard into a recorded entry
//!
//! # Example
//!
//! ```rust,no_run
//! use moodwell::backend::{EntryStore, SessionAuth};
//! use moodwell::entries::{Emotion, Trigger};
//! use moodwell::wizard::{submit, FileStore, WizardStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = WizardStore::open(FileStore::new("./state"));
//! store.set_selected_value(Emotion::Calm);
//! store.next_step();
//! store.set_selected_overall_number(6);
//! store.next_step();
//! store.set_selected_trigger(Trigger::Sleep);
//!
//! let backend = EntryStore::new();
//! let entry = submit(&store, &backend, &SessionAuth::signed_in("user-1")).await?;
//! println!("recorded {}", entry.id);
//! # Ok(())
//! # }
//! ```

mod error;
mod persist;
mod state;
mod store;
mod submit;

pub use error::{WizardError, WizardResult};
pub use persist::{FileStore, KeyValueStore, MemoryStore, PersistError};
pub use state::{WizardState, WizardStep, WIZARD_STEPS};
pub use store::{WizardStore, STORAGE_KEY};
pub use submit::submit;
