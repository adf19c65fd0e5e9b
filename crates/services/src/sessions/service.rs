use std::fmt;

use chrono::Duration;

use assess_core::clock::{SessionClock, TickOutcome};
use assess_core::model::{
    Answer, AttemptId, ConfigurationError, ProgressSnapshot, ServerGrade, SessionResult, TaskList,
    TaskSpec,
};
use assess_core::scoring::{Scorecard, score_session};
use assess_core::time::Clock;

use super::progress::{ProgressStore, ProgressView};
use crate::error::SessionError;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a session: `Configuring → Active → {Paused ↔ Active} → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Pre-start rules screen; the clock is not running.
    Configuring,
    Active,
    Paused,
    /// Terminal; holds the one and only `SessionResult`.
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Configuring => "configuring",
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
        };
        f.write_str(name)
    }
}

//
// ─── CONFIGURATION ─────────────────────────────────────────────────────────────
//

/// Inputs supplied by the assessment catalog provider at configuration time.
///
/// `pass_threshold` is deliberately required: exams and challenges pass
/// different thresholds, so there is no default to infer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub tasks: Vec<TaskSpec>,
    pub total_seconds: u32,
    pub pass_threshold: u32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed attempt at an exam or challenge.
///
/// Owns the task registry, the countdown, and all progress. Purely
/// synchronous; the only async boundary (the remote grading call) lives in
/// `SubmissionService`, which drives `install_result`/`merge_server_grade`
/// through the crate-private seam. Dropping a session before it reaches
/// `Completed` is an abandon: nothing is scored and no result exists.
pub struct SessionService {
    attempt_id: AttemptId,
    tasks: TaskList,
    pass_threshold: u32,
    clock: Clock,
    countdown: SessionClock,
    store: ProgressStore,
    state: SessionState,
    result: Option<SessionResult>,
}

impl SessionService {
    /// Validate provider inputs and build a session in `Configuring`.
    ///
    /// `clock` should be `Clock::default_clock()` in production and a fixed
    /// clock in tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an empty catalog, negative points,
    /// a zero duration, or a threshold above 100.
    pub fn new(config: SessionConfig, clock: Clock) -> Result<Self, ConfigurationError> {
        if config.total_seconds == 0 {
            return Err(ConfigurationError::InvalidDuration { seconds: 0 });
        }
        if config.pass_threshold > 100 {
            return Err(ConfigurationError::InvalidThreshold {
                threshold: config.pass_threshold,
            });
        }
        let tasks = TaskList::from_specs(config.tasks)?;

        Ok(Self {
            attempt_id: AttemptId::new(),
            tasks,
            pass_threshold: config.pass_threshold,
            clock,
            countdown: SessionClock::new(config.total_seconds),
            store: ProgressStore::new(),
            state: SessionState::Configuring,
            result: None,
        })
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    #[must_use]
    pub fn pass_threshold(&self) -> u32 {
        self.pass_threshold
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// The terminal result, present only once the session is `Completed`.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.countdown.remaining(self.clock.now())
    }

    /// Seconds consumed so far, capped at the session's total budget.
    #[must_use]
    pub fn time_spent_seconds(&self) -> u32 {
        self.countdown.time_spent(self.clock.now())
    }

    /// Aggregate progress for the host UI.
    #[must_use]
    pub fn progress(&self) -> ProgressView {
        let total = self.tasks.len();
        let answered = self.store.answered_count();
        ProgressView {
            total,
            answered,
            completed: self.store.completed_count(),
            remaining: total.saturating_sub(answered),
            is_submitted: self.is_complete(),
        }
    }

    /// Advance the session's fixed clock, for deterministic tests.
    ///
    /// Has no effect when the session runs on the default wall clock.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock.advance(delta);
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Enter `Active` and start the countdown. Valid exactly once, from
    /// `Configuring`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` from any other state.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Configuring {
            return Err(SessionError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }
        self.countdown.start(self.clock.now());
        self.state = SessionState::Active;
        Ok(())
    }

    /// Freeze the countdown. Only some assessment types expose this.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `Active`.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::InvalidState {
                operation: "pause",
                state: self.state,
            });
        }
        self.countdown.pause(self.clock.now());
        self.state = SessionState::Paused;
        Ok(())
    }

    /// Resume a paused countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `Paused`.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Paused {
            return Err(SessionError::InvalidState {
                operation: "resume",
                state: self.state,
            });
        }
        self.countdown.resume(self.clock.now());
        self.state = SessionState::Active;
        Ok(())
    }

    /// Re-evaluate the countdown against wall-clock time.
    ///
    /// Invoked roughly once per second by the host's scheduler, but the
    /// cadence carries no meaning: remaining time is derived from elapsed
    /// wall time. The first tick that observes zero reports `just_expired`;
    /// from that instant the session refuses further edits, so the forced
    /// submission always wins over pending user mutations.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == SessionState::Completed {
            return TickOutcome {
                remaining_seconds: 0,
                just_expired: false,
            };
        }
        self.countdown.tick(self.clock.now())
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    /// Record or overwrite the answer for a task. Navigation is unordered:
    /// any valid index is accepted regardless of other tasks' state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` before start, after completion,
    /// or once the clock has expired; `SessionError::UnknownTask` for an
    /// out-of-range index.
    pub fn set_answer(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_editable("set_answer")?;
        self.ensure_known(index)?;
        self.store.set_answer(index, value, self.clock.now());
        Ok(())
    }

    /// Mark a task completed with a score, clamped to the task's points.
    ///
    /// Idempotent: a repeat call overwrites the stored score, which is how
    /// re-grading and overrides land.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SessionService::set_answer`].
    pub fn mark_complete(&mut self, index: usize, score: u32) -> Result<(), SessionError> {
        self.ensure_editable("mark_complete")?;
        self.ensure_known(index)?;
        // Invariant: a stored score never exceeds the task's points.
        let points = self.tasks.get(index).map_or(0, |t| t.points());
        self.store.mark_complete(index, score.min(points));
        Ok(())
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.store.answer(index)
    }

    /// Immutable copy of all progress, for scoring.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.store.snapshot()
    }

    fn ensure_editable(&self, operation: &'static str) -> Result<(), SessionError> {
        let editable = matches!(self.state, SessionState::Active | SessionState::Paused)
            && !self.countdown.is_expired();
        if editable {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn ensure_known(&self, index: usize) -> Result<(), SessionError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(SessionError::UnknownTask { index })
        }
    }

    //
    // ─── COMPLETION (driven by SubmissionService) ──────────────────────────────
    //

    /// Score the current snapshot without touching session state.
    pub(crate) fn local_scorecard(&self, snapshot: &ProgressSnapshot) -> Scorecard {
        score_session(snapshot, &self.tasks, self.pass_threshold)
    }

    /// Install the terminal result and enter `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` if a result exists, or
    /// `SessionError::InvalidState` if the session never started.
    pub(crate) fn install_result(&mut self, result: SessionResult) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        if !matches!(self.state, SessionState::Active | SessionState::Paused) {
            return Err(SessionError::InvalidState {
                operation: "submit",
                state: self.state,
            });
        }
        self.result = Some(result);
        self.state = SessionState::Completed;
        Ok(())
    }

    /// Fold server-authoritative fields into the already-installed result.
    pub(crate) fn merge_server_grade(&mut self, grade: ServerGrade) {
        if let Some(result) = self.result.as_mut() {
            result.merge_server(grade);
        }
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("attempt_id", &self.attempt_id)
            .field("state", &self.state)
            .field("tasks_len", &self.tasks.len())
            .field("pass_threshold", &self.pass_threshold)
            .field("answered", &self.store.answered_count())
            .field("has_result", &self.result.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{TaskKind, TaskProgress};
    use assess_core::time::fixed_clock;

    fn spec(kind: TaskKind, points: i64) -> TaskSpec {
        TaskSpec {
            title: "T".into(),
            description: "Prompt".into(),
            kind,
            points: Some(points),
            correct_answer: None,
        }
    }

    fn session(total_seconds: u32) -> SessionService {
        let config = SessionConfig {
            tasks: vec![spec(TaskKind::Coding, 25), spec(TaskKind::Quiz, 25)],
            total_seconds,
            pass_threshold: 70,
        };
        SessionService::new(config, fixed_clock()).unwrap()
    }

    fn dummy_result(session: &SessionService) -> SessionResult {
        SessionResult {
            attempt_id: session.attempt_id(),
            total_score: 0,
            max_score: 50,
            percentage: 0,
            passed: false,
            per_task: vec![TaskProgress::default(); 2],
            time_spent_seconds: 0,
            certificate_id: None,
            xp_awarded: None,
            leveled_up: None,
            new_level: None,
            rank: None,
        }
    }

    #[test]
    fn zero_duration_is_a_configuration_error() {
        let config = SessionConfig {
            tasks: vec![spec(TaskKind::Coding, 10)],
            total_seconds: 0,
            pass_threshold: 70,
        };
        let err = SessionService::new(config, fixed_clock()).unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidDuration { seconds: 0 });
    }

    #[test]
    fn threshold_above_100_is_a_configuration_error() {
        let config = SessionConfig {
            tasks: vec![spec(TaskKind::Coding, 10)],
            total_seconds: 60,
            pass_threshold: 101,
        };
        let err = SessionService::new(config, fixed_clock()).unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidThreshold { threshold: 101 });
    }

    #[test]
    fn answers_are_rejected_before_start() {
        let mut session = session(60);
        assert_eq!(session.state(), SessionState::Configuring);
        let err = session.set_answer(0, "x").unwrap_err();
        assert!(matches!(err, SessionError::InvalidState { .. }));
    }

    #[test]
    fn start_is_valid_exactly_once() {
        let mut session = session(60);
        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert!(matches!(
            session.start(),
            Err(SessionError::InvalidState { operation: "start", .. })
        ));
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let mut session = session(60);
        session.start().unwrap();
        session.pause().unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        assert!(session.pause().is_err());
        session.resume().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.resume().is_err());
    }

    #[test]
    fn pause_freezes_remaining() {
        let mut session = session(60);
        session.start().unwrap();
        session.advance_clock(Duration::seconds(10));
        session.pause().unwrap();
        session.advance_clock(Duration::seconds(500));
        assert_eq!(session.remaining(), 50);
        session.resume().unwrap();
        session.advance_clock(Duration::seconds(5));
        assert_eq!(session.remaining(), 45);
    }

    #[test]
    fn unordered_navigation_is_accepted() {
        let mut session = session(60);
        session.start().unwrap();
        session.set_answer(1, "later task first").unwrap();
        session.set_answer(0, "earlier task second").unwrap();
        assert_eq!(session.progress().answered, 2);
    }

    #[test]
    fn unknown_index_is_rejected() {
        let mut session = session(60);
        session.start().unwrap();
        let err = session.set_answer(9, "x").unwrap_err();
        assert!(matches!(err, SessionError::UnknownTask { index: 9 }));
    }

    #[test]
    fn mark_complete_clamps_to_task_points() {
        let mut session = session(60);
        session.start().unwrap();
        session.mark_complete(0, 999).unwrap();
        assert_eq!(session.snapshot().progress(0).unwrap().score, 25);
    }

    #[test]
    fn edits_are_refused_once_the_clock_expires() {
        let mut session = session(60);
        session.start().unwrap();
        session.advance_clock(Duration::seconds(61));
        let outcome = session.tick();
        assert!(outcome.just_expired);

        // Still Active until the forced submission lands, but locked.
        assert_eq!(session.state(), SessionState::Active);
        assert!(matches!(
            session.set_answer(0, "too late"),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn install_result_is_single_shot() {
        let mut session = session(60);
        session.start().unwrap();
        let result = dummy_result(&session);
        session.install_result(result.clone()).unwrap();
        assert_eq!(session.state(), SessionState::Completed);
        assert!(matches!(
            session.install_result(result),
            Err(SessionError::AlreadySubmitted)
        ));
    }

    #[test]
    fn install_result_requires_a_started_session() {
        let mut session = session(60);
        let result = dummy_result(&session);
        assert!(matches!(
            session.install_result(result),
            Err(SessionError::InvalidState { operation: "submit", .. })
        ));
    }

    #[test]
    fn completed_session_rejects_edits_and_stops_ticking() {
        let mut session = session(60);
        session.start().unwrap();
        session.install_result(dummy_result(&session)).unwrap();

        assert!(matches!(
            session.set_answer(0, "x"),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.mark_complete(0, 5),
            Err(SessionError::InvalidState { .. })
        ));
        let outcome = session.tick();
        assert!(!outcome.just_expired);
    }

    #[test]
    fn abandoned_session_produces_no_result() {
        let mut session = session(60);
        session.start().unwrap();
        session.set_answer(0, "half done").unwrap();
        assert!(session.result().is_none());
        drop(session);
    }
}
