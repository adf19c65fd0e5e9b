use std::sync::Arc;
use std::time::Duration;

use assess_core::clock::TickOutcome;
use assess_core::model::SessionResult;

use super::grading::{GradeRequest, GradingClient, HttpGradingClient};
use super::service::SessionService;
use crate::error::SessionError;

/// Bound on the single remote grading attempt.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates session submission: local scoring first, then one bounded
/// remote grading attempt whose outcome is merged in if it arrives.
///
/// The local result is installed into the session before the remote call is
/// made, so a submission aborted mid-flight (host shutdown, dropped future)
/// can never leave the session without a terminal result.
#[derive(Clone)]
pub struct SubmissionService {
    grader: Arc<dyn GradingClient>,
    timeout: Duration,
}

impl SubmissionService {
    #[must_use]
    pub fn new(grader: Arc<dyn GradingClient>) -> Self {
        Self {
            grader,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    /// Build a service whose grading endpoint comes from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Arc::new(HttpGradingClient::from_env()))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit the session and produce its terminal result.
    ///
    /// 1. Score the snapshot locally; this result is installed immediately
    ///    and the session enters `Completed`.
    /// 2. Make exactly one remote grading call, bounded by the timeout.
    /// 3. On success, merge server-authoritative fields (server wins); on
    ///    any failure, timeout, or rejection the local result stands.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` on a repeat call and
    /// `SessionError::InvalidState` if the session never started. Remote
    /// failures are never surfaced.
    pub async fn submit(
        &self,
        session: &mut SessionService,
    ) -> Result<SessionResult, SessionError> {
        let snapshot = session.snapshot();
        let card = session.local_scorecard(&snapshot);
        let time_spent_seconds = session.time_spent_seconds();

        let local = SessionResult {
            attempt_id: session.attempt_id(),
            total_score: card.total_score,
            max_score: card.max_score,
            percentage: card.percentage,
            passed: card.passed,
            per_task: card.per_task.clone(),
            time_spent_seconds,
            certificate_id: None,
            xp_awarded: None,
            leveled_up: None,
            new_level: None,
            rank: None,
        };
        session.install_result(local.clone())?;

        let request = GradeRequest {
            attempt_id: session.attempt_id(),
            answers: snapshot.answers().values().cloned().collect(),
            task_progress: card.per_task,
            total_score_local: card.total_score,
            time_spent_seconds,
        };

        match tokio::time::timeout(self.timeout, self.grader.grade(&request)).await {
            Ok(Ok(response)) if response.success => {
                if let Some(grade) = response.result {
                    session.merge_server_grade(grade);
                }
            }
            // Transport error, rejection, or timeout: the local result stands.
            Ok(Ok(_)) | Ok(Err(_)) | Err(_) => {}
        }

        Ok(session.result().cloned().unwrap_or(local))
    }

    /// Deliver one scheduler tick to the session.
    ///
    /// When the tick observes expiry, whatever progress exists at that
    /// instant is submitted immediately, with no grace period. A concurrent
    /// already-completed session is not an error here.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError::InvalidState` from a forced submission on a
    /// session that never started; expiry cannot occur in that state, so in
    /// practice this only surfaces programmer errors.
    pub async fn tick(&self, session: &mut SessionService) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick();
        if outcome.just_expired {
            match self.submit(session).await {
                Ok(_) | Err(SessionError::AlreadySubmitted) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }
}
