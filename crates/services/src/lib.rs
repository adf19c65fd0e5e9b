#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use assess_core::Clock;
pub use error::{GradingError, SessionError};

pub use sessions::{
    DEFAULT_SUBMIT_TIMEOUT, GradeRequest, GradeResponse, GradingClient, GradingConfig,
    HttpGradingClient, ProgressStore, ProgressView, SessionConfig, SessionService, SessionState,
    SubmissionService,
};
