use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw answer for one task.
///
/// Owned exclusively by the progress store and overwritten in place on each
/// edit; only the latest value survives to scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub task_index: usize,
    pub raw_value: String,
    pub submitted_at: DateTime<Utc>,
}

impl Answer {
    #[must_use]
    pub fn new(task_index: usize, raw_value: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            task_index,
            raw_value: raw_value.into(),
            submitted_at,
        }
    }
}
