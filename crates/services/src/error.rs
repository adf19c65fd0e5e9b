//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::ConfigurationError;

use crate::sessions::SessionState;

/// Errors emitted by the session state machine.
///
/// These are programmer errors at the host boundary and always surface
/// synchronously; the engine never auto-corrects an illegal transition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{operation} is not allowed while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("session has already been submitted")]
    AlreadySubmitted,

    #[error("no task at index {index}")]
    UnknownTask { index: usize },

    #[error(transparent)]
    Config(#[from] ConfigurationError),
}

/// Errors emitted by a remote grading client.
///
/// Never user-facing: the submission workflow swallows all of these and
/// falls back to the locally computed result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradingError {
    #[error("remote grading is not configured")]
    Disabled,

    #[error("grading request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("grading endpoint rejected the submission")]
    Rejected,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
