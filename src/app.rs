//! Application state machine: sense, classify, act, settle.
//!
//! Provides [`AppFsm`], which brings the motion sensor up, polls it while idle
//! and drives the outputs while the device spins.
//!
//! ```text
//!  Sweep ──done──> Start                              (power-on only, if enabled)
//!  Start ──fail──> StartDelay ──timer──> Start        (until retries run out → Fault)
//!    │ ok
//!    v
//!  Idle ──timer, motion──> Active ──none──> Idle
//!   ^ └─timer, still──┘       │ positive / negative
//!   │                         v
//!   │                  PosSpin / NegSpin ──> Delay ──timer──> Active
//! ```
//!
//! `Delay` rate-limits how often the strip is re-driven, independently of the
//! sensor sampling cadence. Every state returns after a bounded amount of work,
//! so [`AppFsm::update`] can be called from a busy loop alongside other tasks.

use crate::config::AppConfig;
use crate::config::{DEVICE_NAME, FIRMWARE_VERSION, SWEEP_FRAME_MS};
use crate::output::{Action, Output};
use crate::sensor::{Motion, MotionSensor, SensorReading, Spin};
use crate::sweep::StartupSweep;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::timer::SoftTimer;

/// Why the application stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppFault {
    /// The sensor never passed its health check.
    SensorUnavailable {
        /// Failed checks before giving up.
        attempts: u32,
    },
}

impl core::fmt::Display for AppFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AppFault::SensorUnavailable { attempts } => {
                write!(f, "sensor unavailable after {} attempts", attempts)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AppFault {}

/// The current state of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppState {
    /// Playing the power-on strip sweep.
    Sweep,
    /// Checking sensor health.
    Start,
    /// Waiting before the next health check.
    StartDelay,
    /// Polling the sensor for motion.
    Idle,
    /// Classifying spin direction of the latest sample.
    Active,
    /// Showing positive spin.
    PosSpin,
    /// Showing negative spin.
    NegSpin,
    /// Waiting before the next sample while spinning.
    Delay,
    /// Stopped. Only [`AppFsm::restart`] leaves this state.
    Fault(AppFault),
}

/// Orchestrates the sensor and outputs.
///
/// Owns the sensor and output collaborators and a single [`SoftTimer`] whose
/// duration is rewritten on each state change.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `S` - Motion sensor implementation type
/// * `O` - Output implementation type
pub struct AppFsm<'t, I: TimeInstant, T: TimeSource<I>, S: MotionSensor, O: Output> {
    sensor: S,
    output: O,
    time_source: &'t T,
    timer: SoftTimer<I>,
    sweep: StartupSweep<I>,
    state: AppState,
    config: AppConfig,
    reading: SensorReading,
    failed_checks: u32,
}

impl<'t, I, T, S, O> AppFsm<'t, I, T, S, O>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: MotionSensor,
    O: Output,
{
    /// Creates the application in `Sweep`, or in `Start` when
    /// [`AppConfig::startup_sweep`] is off.
    pub fn new(sensor: S, output: O, time_source: &'t T, config: AppConfig) -> Self {
        log::info!("{} firmware v{}", DEVICE_NAME, FIRMWARE_VERSION);
        log::info!("App start");

        let retry = millis::<I>(config.start_retry.delay_for(1));
        Self {
            sensor,
            output,
            time_source,
            timer: SoftTimer::with_policy(retry, config.rewrite_policy),
            sweep: StartupSweep::new(millis::<I>(SWEEP_FRAME_MS)),
            state: if config.startup_sweep {
                AppState::Sweep
            } else {
                AppState::Start
            },
            config,
            reading: SensorReading::default(),
            failed_checks: 0,
        }
    }

    /// Advances the state machine by one step and returns the new state.
    pub fn update(&mut self) -> AppState {
        let now = self.time_source.now();

        match self.state {
            AppState::Sweep => {
                if let Some(color) = self.sweep.poll(now) {
                    self.output.apply(Action::Sweep(color));
                }
                if self.sweep.is_done() {
                    log::debug!("Sweep done");
                    self.state = AppState::Start;
                }
            }
            AppState::Start => self.start(),
            AppState::StartDelay => {
                if self.timer.poll(now) {
                    self.state = AppState::Start;
                }
            }
            AppState::Idle => {
                if self.timer.poll(now) {
                    self.refresh_reading();
                    let threshold = self.config.spin_threshold;
                    match self.sensor.classify_motion(&self.reading, threshold) {
                        Motion::Idle => {
                            log::debug!("Idle");
                            self.output.apply(Action::Idle);
                        }
                        Motion::Active => {
                            log::info!("Active");
                            self.state = AppState::Active;
                        }
                    }
                }
            }
            AppState::Active => match self
                .sensor
                .classify_spin(&self.reading, self.config.spin_threshold)
            {
                Spin::None => {
                    log::info!("No spin detected");
                    self.enter_timed(AppState::Idle, self.config.idle_poll_ms);
                }
                Spin::Positive => {
                    log::info!("Positive spin detected");
                    self.state = AppState::PosSpin;
                }
                Spin::Negative => {
                    log::info!("Negative spin detected");
                    self.state = AppState::NegSpin;
                }
            },
            AppState::PosSpin => {
                self.output.apply(Action::PositiveSpin);
                self.enter_timed(AppState::Delay, self.config.active_config_ms);
            }
            AppState::NegSpin => {
                self.output.apply(Action::NegativeSpin);
                self.enter_timed(AppState::Delay, self.config.active_config_ms);
            }
            AppState::Delay => {
                if self.timer.poll(now) {
                    self.state = AppState::Active;
                    self.refresh_reading();
                }
            }
            AppState::Fault(_) => {}
        }

        self.state
    }

    /// Leaves any state, including `Fault`, and starts over from `Start`
    /// with a fresh retry budget. The power-on sweep is not replayed.
    pub fn restart(&mut self) {
        log::warn!("App restart from {:?}", self.state);
        self.failed_checks = 0;
        self.reading = SensorReading::default();
        self.timer.arm(millis::<I>(self.config.start_retry.delay_for(1)));
        self.state = AppState::Start;
    }

    /// Returns the current state.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Returns true once the application has stopped on a fault.
    pub fn is_faulted(&self) -> bool {
        matches!(self.state, AppState::Fault(_))
    }

    /// Returns the latest sensor reading.
    pub fn reading(&self) -> SensorReading {
        self.reading
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The motion sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Mutable access to the motion sensor.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// The outputs.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Mutable access to the outputs.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Reads the application's time source.
    pub fn now(&self) -> I {
        self.time_source.now()
    }

    fn start(&mut self) {
        if self.sensor.check() {
            log::info!("IMU ok");
            self.output.apply(Action::SensorReady);
            self.failed_checks = 0;
            self.enter_timed(AppState::Idle, self.config.idle_poll_ms);
            return;
        }

        self.failed_checks = self.failed_checks.saturating_add(1);
        self.output.apply(Action::SensorFault);

        if self.config.start_retry.is_exhausted(self.failed_checks) {
            let fault = AppFault::SensorUnavailable {
                attempts: self.failed_checks,
            };
            log::error!("IMU error, giving up: {}", fault);
            self.output.apply(Action::Halted);
            self.state = AppState::Fault(fault);
            return;
        }

        let delay = self.config.start_retry.delay_for(self.failed_checks);
        log::warn!("IMU error, retry {} in {} ms", self.failed_checks, delay);
        self.enter_timed(AppState::StartDelay, delay);
    }

    fn enter_timed(&mut self, state: AppState, delay_ms: u32) {
        if !self.timer.rewrite(millis::<I>(delay_ms)) {
            log::debug!("timer busy, {:?} keeps previous interval", state);
        }
        self.state = state;
    }

    fn refresh_reading(&mut self) {
        match self.sensor.sample() {
            Ok(reading) => self.reading = reading,
            Err(e) => log::warn!("IMU read failed: {:?}", e),
        }
    }
}

fn millis<I: TimeInstant>(ms: u32) -> I::Duration {
    I::Duration::from_millis(u64::from(ms))
}
