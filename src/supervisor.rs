//! Restart boundary around [`AppFsm`].
//!
//! The application never restarts itself: once it reaches
//! [`AppState::Fault`] it stays there. A [`Supervisor`] decides whether the
//! fault is worth another try, waits a cool-down interval and restarts the
//! application, up to a fixed number of times.
//!
//! The budget is not for the lifetime of the device. Once the application has
//! run healthy (sensor up, past `Start`) for [`RESTART_BUDGET_RESET_MS`], the
//! restart count returns to zero.

use crate::app::{AppFault, AppFsm, AppState};
use crate::config::RESTART_BUDGET_RESET_MS;
use crate::output::Output;
use crate::sensor::MotionSensor;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::timer::SoftTimer;

/// Errors reported by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupervisorError {
    /// The application faulted again after its last allowed restart.
    RestartBudgetExhausted {
        /// The final fault.
        fault: AppFault,
        /// Restarts performed.
        restarts: u32,
    },
}

impl core::fmt::Display for SupervisorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SupervisorError::RestartBudgetExhausted { fault, restarts } => {
                write!(f, "{} (gave up after {} restarts)", fault, restarts)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SupervisorError {}

/// Restarts a faulted application after a cool-down.
#[derive(Debug, Clone, Copy)]
pub struct Supervisor<I: TimeInstant> {
    cooldown: SoftTimer<I>,
    healthy: SoftTimer<I>,
    restarts: u32,
    max_restarts: u32,
}

impl<I: TimeInstant> Supervisor<I> {
    /// Creates a supervisor allowing `max_restarts` restarts, each after `cooldown`.
    pub fn new(cooldown: I::Duration, max_restarts: u32) -> Self {
        Self {
            cooldown: SoftTimer::new(cooldown),
            healthy: SoftTimer::new(I::Duration::from_millis(u64::from(
                RESTART_BUDGET_RESET_MS,
            ))),
            restarts: 0,
            max_restarts,
        }
    }

    /// Updates `app` once, restarting it when a faulted cool-down has elapsed.
    ///
    /// The cool-down starts on the first faulted step and is dropped whenever
    /// the application is seen outside `Fault`, so every fault waits the full
    /// interval.
    ///
    /// # Returns
    /// * `Ok(state)` - The application state after this step
    /// * `Err` - The application is faulted and no restarts remain
    pub fn service<T, S, O>(
        &mut self,
        app: &mut AppFsm<'_, I, T, S, O>,
    ) -> Result<AppState, SupervisorError>
    where
        T: TimeSource<I>,
        S: MotionSensor,
        O: Output,
    {
        let state = app.update();
        let AppState::Fault(fault) = state else {
            self.cooldown.arm(self.cooldown.duration());
            self.track_health(state, app.now());
            return Ok(state);
        };
        self.healthy.arm(self.healthy.duration());

        if self.restarts >= self.max_restarts {
            return Err(SupervisorError::RestartBudgetExhausted {
                fault,
                restarts: self.restarts,
            });
        }

        if self.cooldown.poll(app.now()) {
            self.restarts += 1;
            log::warn!(
                "restarting after fault: {} ({}/{})",
                fault,
                self.restarts,
                self.max_restarts
            );
            app.restart();
        }

        Ok(app.state())
    }

    /// Restarts performed since the budget last refilled.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    fn track_health(&mut self, state: AppState, now: I) {
        let running = matches!(
            state,
            AppState::Idle
                | AppState::Active
                | AppState::PosSpin
                | AppState::NegSpin
                | AppState::Delay
        );
        if !running {
            self.healthy.arm(self.healthy.duration());
            return;
        }

        if self.healthy.poll(now) && self.restarts > 0 {
            log::info!("running healthy, restart budget refilled");
            self.restarts = 0;
        }
    }
}
