//! Device configuration.
//!
//! All tuning lives here as compile-time constants. [`AppConfig::DEFAULT`]
//! bundles them for the application state machine; tests and alternative
//! builds construct their own [`AppConfig`].

use crate::timer::RewritePolicy;

/// Name reported in the startup banner.
pub const DEVICE_NAME: &str = "SpinFlow";

/// Firmware version reported in the startup banner.
pub const FIRMWARE_VERSION: &str = "1.0";

/// Time a button level must hold before an edge is accepted.
pub const DEBOUNCE_SETTLE_MS: u32 = 40;

/// Sensor polling interval while idle.
pub const IDLE_POLL_MS: u32 = 50;

/// Interval between output updates while spinning.
pub const ACTIVE_CONFIG_MS: u32 = 100;

/// First delay before re-checking a sensor that failed its health check.
pub const START_RETRY_MS: u32 = 500;

/// Longest delay between sensor health checks once backoff has grown.
pub const START_RETRY_MAX_MS: u32 = 8_000;

/// Sensor health checks attempted before the application gives up.
pub const START_RETRY_ATTEMPTS: u32 = 8;

/// Angular rate, in degrees per second, above which the device counts as spinning.
pub const SPIN_THRESHOLD_DPS: i16 = 90;

/// Number of pixels on the strip.
pub const STRIP_LENGTH: usize = 20;

/// Channel intensity used for the idle and spin colors.
pub const STRIP_BRIGHTNESS: u8 = 50;

/// Frame interval of the power-on sweep.
pub const SWEEP_FRAME_MS: u32 = 100;

/// Healthy running time after which the supervisor's restart budget refills.
pub const RESTART_BUDGET_RESET_MS: u32 = 60_000;

/// Retry schedule for sensor start-up.
///
/// The delay doubles after each failed attempt, starting at
/// `initial_delay_ms` and capped at `max_delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Delay after the first failure.
    pub initial_delay_ms: u32,

    /// Upper bound on any single delay.
    pub max_delay_ms: u32,

    /// Failed attempts tolerated before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Fixed delay, unlimited attempts.
    pub const fn forever(delay_ms: u32) -> Self {
        Self {
            initial_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            max_attempts: None,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> u32 {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial_delay_ms
            .saturating_mul(1 << doublings)
            .min(self.max_delay_ms)
    }

    /// Returns true once `attempts` failures have used up the budget.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: START_RETRY_MS,
            max_delay_ms: START_RETRY_MAX_MS,
            max_attempts: Some(START_RETRY_ATTEMPTS),
        }
    }
}

/// Runtime view of the application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppConfig {
    /// Sensor polling interval while idle.
    pub idle_poll_ms: u32,

    /// Interval between output updates while spinning.
    pub active_config_ms: u32,

    /// Sensor start-up retry schedule.
    pub start_retry: RetryPolicy,

    /// Spin detection threshold in degrees per second.
    pub spin_threshold: i16,

    /// Channel intensity for strip colors.
    pub brightness: u8,

    /// How the application timer treats a rewrite while running.
    pub rewrite_policy: RewritePolicy,

    /// Run the power-on sweep before the first sensor check.
    pub startup_sweep: bool,
}

impl AppConfig {
    /// Shipping configuration.
    pub const DEFAULT: Self = Self {
        idle_poll_ms: IDLE_POLL_MS,
        active_config_ms: ACTIVE_CONFIG_MS,
        start_retry: RetryPolicy {
            initial_delay_ms: START_RETRY_MS,
            max_delay_ms: START_RETRY_MAX_MS,
            max_attempts: Some(START_RETRY_ATTEMPTS),
        },
        spin_threshold: SPIN_THRESHOLD_DPS,
        brightness: STRIP_BRIGHTNESS,
        rewrite_policy: RewritePolicy::WhenIdle,
        startup_sweep: true,
    };
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
