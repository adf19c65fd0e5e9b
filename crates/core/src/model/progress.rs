use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Answer;

/// Per-task completion state.
///
/// Created lazily on first interaction; `score` is only meaningful once
/// `completed` is set, and may be overwritten by re-grading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskProgress {
    pub completed: bool,
    pub score: u32,
    pub attempts: u32,
}

impl TaskProgress {
    /// Record one more answer attempt.
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Mark the task completed with the given score, overwriting any
    /// previously stored score.
    pub fn complete(&mut self, score: u32) {
        self.completed = true;
        self.score = score;
    }
}

/// Immutable copy of all progress at a point in time, taken for scoring.
///
/// Keyed by task index; tasks the user never touched are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    answers: BTreeMap<usize, Answer>,
    progress: BTreeMap<usize, TaskProgress>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(
        answers: BTreeMap<usize, Answer>,
        progress: BTreeMap<usize, TaskProgress>,
    ) -> Self {
        Self { answers, progress }
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(&index)
    }

    #[must_use]
    pub fn progress(&self, index: usize) -> Option<&TaskProgress> {
        self.progress.get(&index)
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, Answer> {
        &self.answers
    }

    #[must_use]
    pub fn progress_map(&self) -> &BTreeMap<usize, TaskProgress> {
        &self.progress
    }

    /// Number of tasks with a stored answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Number of tasks marked completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.progress.values().filter(|p| p.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn attempts_saturate_instead_of_overflowing() {
        let mut progress = TaskProgress {
            attempts: u32::MAX,
            ..TaskProgress::default()
        };
        progress.record_attempt();
        assert_eq!(progress.attempts, u32::MAX);
    }

    #[test]
    fn complete_overwrites_previous_score() {
        let mut progress = TaskProgress::default();
        progress.complete(7);
        progress.complete(4);
        assert!(progress.completed);
        assert_eq!(progress.score, 4);
    }

    #[test]
    fn snapshot_counts_answers_and_completions() {
        let mut answers = BTreeMap::new();
        answers.insert(0, Answer::new(0, "a", fixed_now()));
        answers.insert(2, Answer::new(2, "b", fixed_now()));

        let mut progress = BTreeMap::new();
        let mut done = TaskProgress::default();
        done.complete(10);
        progress.insert(0, done);
        progress.insert(2, TaskProgress::default());

        let snapshot = ProgressSnapshot::new(answers, progress);
        assert_eq!(snapshot.answered_count(), 2);
        assert_eq!(snapshot.completed_count(), 1);
        assert!(snapshot.answer(1).is_none());
    }
}
