//! Cooperative, edge-triggered single-shot timer.
//!
//! A [`SoftTimer`] never blocks and owns no clock. The caller passes the current
//! instant to [`SoftTimer::poll`] once per loop iteration:
//!
//! - polling an idle timer latches the start instant and returns `false`,
//! - polling a running timer returns `true` exactly once, on the first call at
//!   which the configured duration has elapsed, and leaves it idle again.
//!
//! There is no separate start call. The next poll after an expiry starts the
//! following interval.

use crate::time::{TimeDuration, TimeInstant};

/// How [`SoftTimer::rewrite`] treats an interval that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RewritePolicy {
    /// Only an idle timer accepts a new duration; a running interval keeps the
    /// duration it was started with.
    #[default]
    WhenIdle,

    /// The new duration applies at once, including to a running interval.
    /// Elapsed time is not reset, so it is compared against the original start.
    Immediate,
}

/// Restartable single-shot duration timer.
#[derive(Debug, Clone, Copy)]
pub struct SoftTimer<I: TimeInstant> {
    start: Option<I>,
    duration: I::Duration,
    policy: RewritePolicy,
}

impl<I: TimeInstant> SoftTimer<I> {
    /// Creates an idle timer with the default [`RewritePolicy::WhenIdle`].
    ///
    /// Nothing is counted until the first [`poll`](Self::poll).
    pub fn new(duration: I::Duration) -> Self {
        Self::with_policy(duration, RewritePolicy::WhenIdle)
    }

    /// Creates an idle timer with an explicit rewrite policy.
    pub fn with_policy(duration: I::Duration, policy: RewritePolicy) -> Self {
        Self {
            start: None,
            duration,
            policy,
        }
    }

    /// Re-initialises the timer: sets `duration` and drops any running interval.
    pub fn arm(&mut self, duration: I::Duration) {
        self.duration = duration;
        self.start = None;
    }

    /// Advances the timer.
    ///
    /// Returns `true` once per interval, on the first poll at which
    /// `now - start >= duration`.
    pub fn poll(&mut self, now: I) -> bool {
        match self.start {
            None => {
                self.start = Some(now);
                false
            }
            Some(start) => {
                let elapsed = now.duration_since(start);
                if elapsed.as_millis() >= self.duration.as_millis() {
                    self.start = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Sets the duration used by the next interval, subject to the policy.
    ///
    /// Returns whether the new duration was applied.
    pub fn rewrite(&mut self, duration: I::Duration) -> bool {
        match self.policy {
            RewritePolicy::WhenIdle if self.is_running() => false,
            RewritePolicy::WhenIdle | RewritePolicy::Immediate => {
                self.duration = duration;
                true
            }
        }
    }

    /// Returns true while an interval is in flight.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    /// Returns the configured duration.
    #[inline]
    pub fn duration(&self) -> I::Duration {
        self.duration
    }

    /// Returns the rewrite policy chosen at construction.
    #[inline]
    pub fn policy(&self) -> RewritePolicy {
        self.policy
    }
}
