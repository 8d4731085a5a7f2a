#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`SoftTimer`**: Non-blocking, edge-triggered single-shot timer polled with the current instant
//! - **`DebounceFsm`**: Two-stage button debouncer with a read-clears press latch
//! - **`AppFsm`**: Application state machine that brings up the motion sensor and reacts to spin
//! - **`PixelStrip`**: Fixed-length pixel buffer and WS2812 pulse encoder
//! - **`StripOutput`**: Maps application `Action`s onto the strip and status LEDs
//! - **`Supervisor`**: Restart boundary around a faulted `AppFsm`
//! - **`TimeSource`**, **`ButtonInput`**, **`MotionSensor`**, **`PulseTransmitter`**, **`Indicators`**:
//!   Traits to implement for your hardware
//!
//! Everything runs from one cooperative loop. No call blocks, and each state
//! machine owns its timer.

pub mod app;
pub mod blink;
pub mod colors;
pub mod config;
pub mod debounce;
pub mod output;
pub mod pixel;
pub mod sensor;
pub mod supervisor;
pub mod sweep;
pub mod time;
pub mod timer;

pub use app::{AppFault, AppFsm, AppState};
pub use blink::{BlinkMode, ButtonBlinker};
pub use config::{AppConfig, RetryPolicy};
pub use debounce::{ButtonInput, DebounceFsm, DebounceState};
pub use output::{Action, Indicators, Output, StatusLed, StripOutput};
pub use pixel::{EncodeError, Pixel, PixelStrip, PulseTransmitter, pulse_buffer_len};
pub use sensor::{Motion, MotionSensor, SensorReading, Spin};
pub use supervisor::{Supervisor, SupervisorError};
pub use sweep::StartupSweep;
pub use time::{Millis, Tick, TimeDuration, TimeInstant, TimeSource};
pub use timer::{RewritePolicy, SoftTimer};

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

/// Strip sized for the device, with a matching pulse buffer.
pub type DeviceStrip = PixelStrip<{ config::STRIP_LENGTH }, { pulse_buffer_len(config::STRIP_LENGTH) }>;
