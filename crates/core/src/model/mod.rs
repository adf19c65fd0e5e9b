mod answer;
mod ids;
mod progress;
mod result;
mod task;

pub use answer::Answer;
pub use ids::AttemptId;
pub use progress::{ProgressSnapshot, TaskProgress};
pub use result::{ServerGrade, SessionResult};
pub use task::{ConfigurationError, DEFAULT_TASK_POINTS, Task, TaskKind, TaskList, TaskSpec};
