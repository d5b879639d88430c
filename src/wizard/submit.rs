//! Wizard submission
//!
//! Reads the finished wizard, records it through the backend, and resets
//! the wizard once the backend has accepted the entry.

use crate::backend::{AuthContext, MoodBackend};
use crate::entries::MoodEntry;
use crate::wizard::error::{WizardError, WizardResult};
use crate::wizard::persist::KeyValueStore;
use crate::wizard::store::WizardStore;

/// Submit the current wizard state as a new mood entry
///
/// On any failure the wizard is left untouched so the user can retry.
pub async fn submit<S, B>(
    store: &WizardStore<S>,
    backend: &B,
    auth: &dyn AuthContext,
) -> WizardResult<MoodEntry>
where
    S: KeyValueStore,
    B: MoodBackend + ?Sized,
{
    let user_id = auth.user_id().ok_or(WizardError::NotSignedIn)?;
    let new_entry = store.state().to_new_entry(&user_id)?;

    let entry = backend.create_entry(new_entry).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to submit mood entry");
        WizardError::Backend(e)
    })?;

    store.clear_all();
    tracing::info!(id = %entry.id, "Mood entry submitted");

    Ok(entry)
}
