use serde::{Deserialize, Serialize};

use crate::model::{AttemptId, TaskProgress};
use crate::scoring::percentage_of;

/// Server-authoritative grading outcome returned by the remote endpoint.
///
/// Every field except `passed` is optional; whatever the server supplies
/// takes precedence over the locally computed value when merged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerGrade {
    pub passed: bool,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub xp_awarded: Option<u32>,
    #[serde(default)]
    pub leveled_up: Option<bool>,
    #[serde(default)]
    pub new_level: Option<u32>,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// Terminal outcome of a session, produced exactly once at submission.
///
/// Starts as a purely local computation and may later absorb
/// server-authoritative fields through [`SessionResult::merge_server`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub attempt_id: AttemptId,
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub passed: bool,
    pub per_task: Vec<TaskProgress>,
    pub time_spent_seconds: u32,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub xp_awarded: Option<u32>,
    #[serde(default)]
    pub leveled_up: Option<bool>,
    #[serde(default)]
    pub new_level: Option<u32>,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl SessionResult {
    /// True if the remote grading service contributed to this result.
    #[must_use]
    pub fn is_server_graded(&self) -> bool {
        self.certificate_id.is_some()
            || self.xp_awarded.is_some()
            || self.leveled_up.is_some()
            || self.new_level.is_some()
            || self.rank.is_some()
    }

    /// Fold a server grade into this result.
    ///
    /// Server values win wherever both sides have one: the pass flag is
    /// replaced outright, and a server score override replaces `total_score`
    /// and recomputes `percentage` against the unchanged `max_score`.
    pub fn merge_server(&mut self, grade: ServerGrade) {
        self.passed = grade.passed;
        if let Some(score) = grade.score {
            self.total_score = score;
            self.percentage = percentage_of(score, self.max_score);
        }
        if grade.certificate_id.is_some() {
            self.certificate_id = grade.certificate_id;
        }
        if grade.xp_awarded.is_some() {
            self.xp_awarded = grade.xp_awarded;
        }
        if grade.leveled_up.is_some() {
            self.leveled_up = grade.leveled_up;
        }
        if grade.new_level.is_some() {
            self.new_level = grade.new_level;
        }
        if grade.rank.is_some() {
            self.rank = grade.rank;
        }
    }
}
