mod grading;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{GradingError, SessionError};
pub use grading::{GradeRequest, GradeResponse, GradingClient, GradingConfig, HttpGradingClient};
pub use progress::{ProgressStore, ProgressView};
pub use service::{SessionConfig, SessionService, SessionState};
pub use workflow::{DEFAULT_SUBMIT_TIMEOUT, SubmissionService};
