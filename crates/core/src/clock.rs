//! Wall-clock countdown for a timed session.
//!
//! The tick is only a trigger to re-evaluate elapsed wall time; remaining
//! time is always derived as `total - elapsed`, never decremented per tick,
//! so a throttled or backgrounded host that delivers late or skipped ticks
//! cannot make the countdown drift.

use chrono::{DateTime, Duration, Utc};

/// Lifecycle of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// Not started yet.
    Idle,
    Running,
    Paused,
    /// Reached zero; terminal.
    Expired,
}

/// Result of evaluating one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_seconds: u32,
    /// Set on exactly one tick: the first one that observes zero remaining.
    pub just_expired: bool,
}

/// Countdown over a fixed budget of seconds, with pause support.
///
/// Paused spans are excluded from elapsed time, so `remaining` freezes while
/// paused and resumes from the same value. Once a tick observes zero the
/// clock is expired for good; later ticks are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    total_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    paused_total: Duration,
    expired: bool,
}

impl SessionClock {
    #[must_use]
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            started_at: None,
            paused_at: None,
            paused_total: Duration::zero(),
            expired: false,
        }
    }

    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    #[must_use]
    pub fn phase(&self) -> ClockPhase {
        if self.expired {
            ClockPhase::Expired
        } else if self.paused_at.is_some() {
            ClockPhase::Paused
        } else if self.started_at.is_some() {
            ClockPhase::Running
        } else {
            ClockPhase::Idle
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Start the countdown. Starting an already-started clock is a no-op.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Freeze the countdown. No-op unless currently running.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.phase() == ClockPhase::Running {
            self.paused_at = Some(now);
        }
    }

    /// Resume a paused countdown, excluding the paused span from elapsed time.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.paused_at.take() {
            let span = (now - paused_at).max(Duration::zero());
            self.paused_total += span;
        }
    }

    /// Wall-clock seconds consumed so far, excluding paused spans.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let effective_now = self.paused_at.unwrap_or(now);
        let elapsed = (effective_now - started_at) - self.paused_total;
        u32::try_from(elapsed.num_seconds().max(0)).unwrap_or(u32::MAX)
    }

    /// Seconds left on the budget, derived from wall-clock elapsed time.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> u32 {
        self.total_seconds
            .saturating_sub(self.elapsed_seconds(now))
    }

    /// Seconds spent, capped at the total budget.
    #[must_use]
    pub fn time_spent(&self, now: DateTime<Utc>) -> u32 {
        self.elapsed_seconds(now).min(self.total_seconds)
    }

    /// Re-evaluate the countdown.
    ///
    /// Ticks are ignored while paused and after expiry. The first tick that
    /// observes zero remaining reports `just_expired` and moves the clock to
    /// its terminal phase.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.expired {
            return TickOutcome {
                remaining_seconds: 0,
                just_expired: false,
            };
        }

        let remaining_seconds = self.remaining(now);
        if self.paused_at.is_some() || self.started_at.is_none() {
            return TickOutcome {
                remaining_seconds,
                just_expired: false,
            };
        }

        if remaining_seconds == 0 {
            self.expired = true;
            return TickOutcome {
                remaining_seconds: 0,
                just_expired: true,
            };
        }

        TickOutcome {
            remaining_seconds,
            just_expired: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[test]
    fn idle_clock_reports_full_budget() {
        let clock = SessionClock::new(300);
        assert_eq!(clock.phase(), ClockPhase::Idle);
        assert_eq!(clock.remaining(fixed_now()), 300);
        assert_eq!(clock.elapsed_seconds(fixed_now()), 0);
    }

    #[test]
    fn remaining_is_derived_from_wall_clock_not_tick_count() {
        let t0 = fixed_now();
        let mut clock = SessionClock::new(300);
        clock.start(t0);

        // A single late tick after 50 wall seconds must cost 50, not 1.
        let out = clock.tick(t0 + secs(50));
        assert_eq!(out.remaining_seconds, 250);
        assert!(!out.just_expired);
    }

    #[test]
    fn remaining_is_monotonic_while_running() {
        let t0 = fixed_now();
        let mut clock = SessionClock::new(60);
        clock.start(t0);

        let mut last = clock.remaining(t0);
        for step in 1..=70 {
            let now = clock.tick(t0 + secs(step)).remaining_seconds;
            assert!(now <= last);
            last = now;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn pause_freezes_remaining_and_resume_restores_it() {
        let t0 = fixed_now();
        let mut clock = SessionClock::new(120);
        clock.start(t0);
        clock.pause(t0 + secs(30));

        // Ticks during the pause neither advance nor expire anything.
        let out = clock.tick(t0 + secs(500));
        assert_eq!(out.remaining_seconds, 90);
        assert!(!out.just_expired);
        assert_eq!(clock.phase(), ClockPhase::Paused);

        clock.resume(t0 + secs(500));
        assert_eq!(clock.remaining(t0 + secs(500)), 90);
        assert_eq!(clock.remaining(t0 + secs(510)), 80);
    }

    #[test]
    fn expiry_is_reported_exactly_once() {
        let t0 = fixed_now();
        let mut clock = SessionClock::new(10);
        clock.start(t0);

        let first = clock.tick(t0 + secs(12));
        assert!(first.just_expired);
        assert_eq!(first.remaining_seconds, 0);
        assert_eq!(clock.phase(), ClockPhase::Expired);

        let second = clock.tick(t0 + secs(13));
        assert!(!second.just_expired);
        assert_eq!(second.remaining_seconds, 0);
    }

    #[test]
    fn time_spent_is_capped_at_total() {
        let t0 = fixed_now();
        let mut clock = SessionClock::new(120);
        clock.start(t0);
        let _ = clock.tick(t0 + secs(125));
        assert_eq!(clock.time_spent(t0 + secs(125)), 120);
    }

    #[test]
    fn pause_while_idle_or_expired_is_ignored() {
        let t0 = fixed_now();
        let mut clock = SessionClock::new(10);
        clock.pause(t0);
        assert_eq!(clock.phase(), ClockPhase::Idle);

        clock.start(t0);
        let _ = clock.tick(t0 + secs(20));
        clock.pause(t0 + secs(21));
        assert_eq!(clock.phase(), ClockPhase::Expired);
    }
}
