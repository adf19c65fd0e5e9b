//! Pure scoring over a progress snapshot.
//!
//! The engine scores exactly once, at submission. Objective tasks with an
//! answer are auto-graded here; subjective tasks only count when they were
//! explicitly marked complete. Nothing in this module has a pass threshold
//! of its own: exams and challenges pass different thresholds in.

use crate::model::{ProgressSnapshot, Task, TaskList, TaskProgress};

/// Aggregate result of scoring one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorecard {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub passed: bool,
    /// One entry per task, in catalog order.
    pub per_task: Vec<TaskProgress>,
}

/// Rounded percentage of `total` against `max`, with a zero-max guard.
#[must_use]
pub fn percentage_of(total: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let pct = 100.0 * f64::from(total) / f64::from(max);
    // round() stays within u32 range because total is clamped to max per task.
    pct.round() as u32
}

/// Auto-grade an objective task: full points on a trimmed, case-insensitive
/// match against the expected answer, zero otherwise.
///
/// Returns `None` for subjective tasks and for objective tasks without an
/// expected answer, which cannot be graded mechanically.
#[must_use]
pub fn auto_score(task: &Task, raw_value: &str) -> Option<u32> {
    if !task.kind().is_objective() {
        return None;
    }
    let expected = task.correct_answer()?;
    let matched = raw_value.trim().to_lowercase() == expected.trim().to_lowercase();
    Some(if matched { task.points() } else { 0 })
}

/// Score a snapshot against the task registry.
///
/// Every task yields one `TaskProgress` entry: explicitly completed tasks
/// keep their stored score (clamped to the task's points), objective tasks
/// with an unscored answer are auto-graded, and everything else scores zero.
#[must_use]
pub fn score_session(
    snapshot: &ProgressSnapshot,
    tasks: &TaskList,
    pass_threshold: u32,
) -> Scorecard {
    let mut per_task = Vec::with_capacity(tasks.len());

    for task in tasks.iter() {
        let stored = snapshot.progress(task.index()).cloned().unwrap_or_default();
        let entry = if stored.completed {
            TaskProgress {
                completed: true,
                score: stored.score.min(task.points()),
                attempts: stored.attempts,
            }
        } else if let Some(score) = snapshot
            .answer(task.index())
            .and_then(|answer| auto_score(task, &answer.raw_value))
        {
            TaskProgress {
                completed: true,
                score,
                attempts: stored.attempts,
            }
        } else {
            TaskProgress {
                completed: false,
                score: 0,
                attempts: stored.attempts,
            }
        };
        per_task.push(entry);
    }

    let max_score = tasks.max_score();
    let total_score = per_task
        .iter()
        .filter(|p| p.completed)
        .map(|p| p.score)
        .sum();
    let percentage = percentage_of(total_score, max_score);

    Scorecard {
        total_score,
        max_score,
        percentage,
        passed: percentage >= pass_threshold,
        per_task,
    }
}
