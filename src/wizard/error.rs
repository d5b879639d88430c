//! Wizard error types

use crate::backend::BackendError;
use thiserror::Error;

/// Errors raised when turning wizard state into a submitted entry
#[derive(Error, Debug)]
pub enum WizardError {
    /// A required selection has not been made yet
    #[error("Wizard incomplete: no {0} selected")]
    Incomplete(&'static str),

    #[error("No signed-in user")]
    NotSignedIn,

    #[error("Submission failed: {0}")]
    Backend(#[from] BackendError),
}

pub type WizardResult<T> = Result<T, WizardError>;
