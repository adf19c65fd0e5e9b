use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points awarded for a task when the catalog does not specify any.
pub const DEFAULT_TASK_POINTS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("assessment catalog contains no tasks")]
    EmptyCatalog,

    #[error("task {index} has negative points: {points}")]
    NegativePoints { index: usize, points: i64 },

    #[error("session duration must be positive, got {seconds}")]
    InvalidDuration { seconds: i64 },

    #[error("pass threshold must be a percentage in 0..=100, got {threshold}")]
    InvalidThreshold { threshold: u32 },
}

/// The kind of work a task asks for.
///
/// Objective kinds carry a known correct answer and can be auto-graded at
/// submission; subjective kinds are only ever scored through an explicit
/// completion signal or a remote-grading merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Coding,
    Quiz,
    Project,
    Design,
    Analysis,
    MultipleChoice,
}

impl TaskKind {
    /// Returns true for kinds whose answers can be checked mechanically.
    #[must_use]
    pub fn is_objective(&self) -> bool {
        matches!(self, TaskKind::Quiz | TaskKind::MultipleChoice)
    }
}

/// Catalog shape for a single task, as supplied by the assessment provider.
///
/// `points` may be omitted (defaults to [`DEFAULT_TASK_POINTS`]) and is
/// signed only because the provider's format does not forbid negatives;
/// validation happens in [`TaskList::from_specs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub correct_answer: Option<String>,
}

/// A single gradable unit within a session, immutable once the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    index: usize,
    title: String,
    prompt: String,
    kind: TaskKind,
    points: u32,
    correct_answer: Option<String>,
}

impl Task {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }
}

/// Immutable ordered task registry, populated once at configuration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Validate a provider catalog into a task registry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EmptyCatalog` for an empty catalog and
    /// `ConfigurationError::NegativePoints` for any task with negative points.
    pub fn from_specs(specs: Vec<TaskSpec>) -> Result<Self, ConfigurationError> {
        if specs.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut tasks = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            let points = match spec.points {
                Some(p) if p < 0 => {
                    return Err(ConfigurationError::NegativePoints { index, points: p });
                }
                Some(p) => u32::try_from(p).unwrap_or(u32::MAX),
                None => DEFAULT_TASK_POINTS,
            };
            tasks.push(Task {
                index,
                title: spec.title,
                prompt: spec.description,
                kind: spec.kind,
                points,
                correct_answer: spec.correct_answer,
            });
        }

        Ok(Self { tasks })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Sum of points across all tasks.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.tasks.iter().map(Task::points).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}
