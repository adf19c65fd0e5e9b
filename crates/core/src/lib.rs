#![forbid(unsafe_code)]

pub mod clock;
pub mod model;
pub mod scoring;
pub mod time;

pub use clock::{ClockPhase, SessionClock, TickOutcome};
pub use model::{
    Answer, AttemptId, ConfigurationError, ProgressSnapshot, ServerGrade, SessionResult, Task,
    TaskKind, TaskList, TaskProgress, TaskSpec,
};
pub use scoring::{Scorecard, score_session};
pub use time::Clock;
