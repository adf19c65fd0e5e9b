use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use assess_core::model::{Answer, ProgressSnapshot, TaskProgress};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub total: usize,
    pub answered: usize,
    pub completed: usize,
    pub remaining: usize,
    pub is_submitted: bool,
}

/// In-memory store of answers and per-task completion, keyed by task index.
///
/// Records are created lazily on first interaction; tasks the user never
/// visits have no entry until scoring, where they count as zero. The store
/// itself is state-agnostic: lifecycle gating (no edits after completion)
/// lives in the session state machine that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressStore {
    answers: BTreeMap<usize, Answer>,
    progress: BTreeMap<usize, TaskProgress>,
}

impl ProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer for a task, overwriting any previous value and
    /// bumping the task's attempt count.
    pub fn set_answer(&mut self, index: usize, value: impl Into<String>, now: DateTime<Utc>) {
        self.progress.entry(index).or_default().record_attempt();
        self.answers.insert(index, Answer::new(index, value, now));
    }

    /// Mark a task completed with the given score.
    ///
    /// Idempotent: re-invoking overwrites the stored score, which is how
    /// overrides and re-grading land.
    pub fn mark_complete(&mut self, index: usize, score: u32) {
        self.progress.entry(index).or_default().complete(score);
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(&index)
    }

    #[must_use]
    pub fn progress(&self, index: usize) -> Option<&TaskProgress> {
        self.progress.get(&index)
    }

    /// Number of tasks with a stored answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Number of tasks explicitly marked completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.progress.values().filter(|p| p.completed).count()
    }

    /// Immutable copy of all progress, taken for scoring.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(self.answers.clone(), self.progress.clone())
    }
}
