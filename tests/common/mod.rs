//! Shared test infrastructure for spinflow integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use spinflow::{
    Action, AppConfig, AppFsm, Indicators, MotionSensor, Output, PulseTransmitter, SensorReading,
    StatusLed, Tick, TimeSource,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<Tick>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(Tick(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Tick(current.0.wrapping_add(millis)));
    }

    pub fn now_millis(&self) -> u32 {
        self.current_time.get().0
    }

    pub fn set_time(&self, time: Tick) {
        self.current_time.set(time);
    }
}

impl TimeSource<Tick> for MockTimeSource {
    fn now(&self) -> Tick {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Sensor
// ============================================================================

/// Sensor with scripted health checks and a settable reading
pub struct MockSensor {
    check_results: heapless::Deque<bool, 16>,
    /// Result of checks once the script runs out
    pub healthy: bool,
    pub reading: SensorReading,
    pub fail_samples: bool,
    pub checks: u32,
    pub samples: u32,
}

impl MockSensor {
    pub fn healthy() -> Self {
        Self::scripted(&[])
    }

    /// Health checks return `script` in order, then `true`
    pub fn scripted(script: &[bool]) -> Self {
        let mut check_results = heapless::Deque::new();
        for result in script {
            check_results.push_back(*result).unwrap();
        }
        Self {
            check_results,
            healthy: true,
            reading: SensorReading::default(),
            fail_samples: false,
            checks: 0,
            samples: 0,
        }
    }

    pub fn always_failing() -> Self {
        let mut sensor = Self::scripted(&[]);
        sensor.healthy = false;
        sensor
    }
}

impl MotionSensor for MockSensor {
    type Error = &'static str;

    fn check(&mut self) -> bool {
        self.checks += 1;
        self.check_results.pop_front().unwrap_or(self.healthy)
    }

    fn sample(&mut self) -> Result<SensorReading, Self::Error> {
        self.samples += 1;
        if self.fail_samples {
            Err("bus error")
        } else {
            Ok(self.reading)
        }
    }
}

// ============================================================================
// Mock Output
// ============================================================================

/// Output that records every action
pub struct MockOutput {
    actions: heapless::Vec<Action, 128>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            actions: heapless::Vec::new(),
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn count(&self, action: Action) -> usize {
        self.actions.iter().filter(|a| **a == action).count()
    }

    pub fn last(&self) -> Option<Action> {
        self.actions.last().copied()
    }
}

impl Output for MockOutput {
    fn apply(&mut self, action: Action) {
        let _ = self.actions.push(action);
    }
}

// ============================================================================
// Mock Strip Hardware
// ============================================================================

/// Transmitter that keeps the last frame
pub struct MockTransmitter {
    pub frames: u32,
    pub last: heapless::Vec<u16, 480>,
}

impl MockTransmitter {
    pub fn new() -> Self {
        Self {
            frames: 0,
            last: heapless::Vec::new(),
        }
    }
}

impl PulseTransmitter for MockTransmitter {
    fn transmit(&mut self, pulses: &[u16]) {
        self.frames += 1;
        self.last.clear();
        self.last.extend_from_slice(pulses).unwrap();
    }
}

/// Status LEDs as three booleans
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MockIndicators {
    pub app: bool,
    pub sensor: bool,
    pub strip: bool,
}

impl MockIndicators {
    fn slot(&mut self, led: StatusLed) -> &mut bool {
        match led {
            StatusLed::App => &mut self.app,
            StatusLed::Sensor => &mut self.sensor,
            StatusLed::Strip => &mut self.strip,
        }
    }
}

impl Indicators for MockIndicators {
    fn set(&mut self, led: StatusLed, on: bool) {
        *self.slot(led) = on;
    }

    fn toggle(&mut self, led: StatusLed) {
        let slot = self.slot(led);
        *slot = !*slot;
    }
}

// ============================================================================
// Application Helpers
// ============================================================================

pub type TestApp<'t> = AppFsm<'t, Tick, MockTimeSource, MockSensor, MockOutput>;

/// Shipping configuration without the power-on sweep, so the app begins in
/// `Start`.
pub fn test_config() -> AppConfig {
    AppConfig {
        startup_sweep: false,
        ..AppConfig::default()
    }
}

pub fn new_app(sensor: MockSensor, time: &MockTimeSource) -> TestApp<'_> {
    new_app_with(sensor, time, test_config())
}

pub fn new_app_with(sensor: MockSensor, time: &MockTimeSource, config: AppConfig) -> TestApp<'_> {
    AppFsm::new(sensor, MockOutput::new(), time, config)
}

/// Runs the control loop for `millis` milliseconds. The loop spins several
/// times per millisecond, so a state change and the poll that starts the next
/// timer land on the same instant.
pub fn run_loop(app: &mut TestApp<'_>, time: &MockTimeSource, millis: u32) {
    for _ in 0..millis {
        for _ in 0..4 {
            app.update();
        }
        time.advance(1);
    }
}
