//! Output side of the application: what the device shows for each event.
//!
//! The state machine only emits [`Action`]s. [`StripOutput`] maps them onto the
//! NeoPixel strip and the board status LEDs.

use crate::colors;
use crate::pixel::{Pixel, PixelStrip, PulseTransmitter};

const IDLE_COLOR: Pixel = Pixel::new(0, 255, 0);
const POSITIVE_COLOR: Pixel = Pixel::new(255, 0, 0);
const NEGATIVE_COLOR: Pixel = Pixel::new(0, 0, 255);

/// Something the application wants the user to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// No rotation.
    Idle,
    /// Rotation in the positive direction.
    PositiveSpin,
    /// Rotation in the negative direction.
    NegativeSpin,
    /// Sensor failed its health check.
    SensorFault,
    /// Sensor passed its health check.
    SensorReady,
    /// Application stopped on an unrecoverable fault.
    Halted,
    /// Power-on test frame: the whole strip in one color, shown as is.
    Sweep(Pixel),
}

/// Trait for abstracting the device outputs.
pub trait Output {
    /// Shows `action`.
    ///
    /// Implementations handle any hardware errors internally; this method
    /// cannot fail.
    fn apply(&mut self, action: Action);
}

/// Board status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLed {
    /// Application fault.
    App,
    /// Sensor fault.
    Sensor,
    /// Strip activity.
    Strip,
}

/// Trait for abstracting single-color status LEDs.
pub trait Indicators {
    /// Switches `led` on or off.
    fn set(&mut self, led: StatusLed, on: bool);

    /// Inverts `led`.
    fn toggle(&mut self, led: StatusLed);
}

/// Boards without status LEDs.
impl Indicators for () {
    fn set(&mut self, _led: StatusLed, _on: bool) {}

    fn toggle(&mut self, _led: StatusLed) {}
}

/// Drives the strip and status LEDs from application actions.
///
/// Idle shows green, positive spin red and negative spin blue, each dimmed to
/// the configured brightness.
pub struct StripOutput<X: PulseTransmitter, D: Indicators, const N: usize, const B: usize> {
    strip: PixelStrip<N, B>,
    transmitter: X,
    indicators: D,
    brightness: u8,
}

impl<X: PulseTransmitter, D: Indicators, const N: usize, const B: usize> StripOutput<X, D, N, B> {
    /// Creates the output with the strip off. Nothing is transmitted yet.
    pub fn new(transmitter: X, indicators: D, brightness: u8) -> Self {
        Self {
            strip: PixelStrip::new(),
            transmitter,
            indicators,
            brightness,
        }
    }

    /// Turns the strip off and transmits.
    pub fn clear(&mut self) {
        self.strip.clear();
        self.show();
    }

    /// The pixel buffer.
    pub fn strip(&self) -> &PixelStrip<N, B> {
        &self.strip
    }

    /// Mutable access to the pixel buffer. Call [`show`](Self::show) afterwards.
    pub fn strip_mut(&mut self) -> &mut PixelStrip<N, B> {
        &mut self.strip
    }

    /// Encodes the current buffer and transmits it.
    pub fn show(&mut self) {
        if let Err(e) = self.strip.flush(&mut self.transmitter) {
            log::error!("strip update failed: {}", e);
        }
    }

    fn paint(&mut self, color: Pixel) {
        self.strip.fill(colors::scale(color, self.brightness));
        self.show();
    }

    /// The pulse transmitter.
    pub fn transmitter(&self) -> &X {
        &self.transmitter
    }

    /// The status LEDs.
    pub fn indicators(&self) -> &D {
        &self.indicators
    }
}

impl<X: PulseTransmitter, D: Indicators, const N: usize, const B: usize> Output
    for StripOutput<X, D, N, B>
{
    fn apply(&mut self, action: Action) {
        match action {
            Action::Idle => {
                self.paint(IDLE_COLOR);
                self.indicators.set(StatusLed::Strip, false);
            }
            Action::PositiveSpin => {
                self.paint(POSITIVE_COLOR);
                self.indicators.toggle(StatusLed::Strip);
            }
            Action::NegativeSpin => {
                self.paint(NEGATIVE_COLOR);
                self.indicators.toggle(StatusLed::Strip);
            }
            Action::SensorFault => self.indicators.set(StatusLed::Sensor, true),
            Action::SensorReady => self.indicators.set(StatusLed::Sensor, false),
            Action::Halted => self.indicators.set(StatusLed::App, true),
            Action::Sweep(color) => {
                self.strip.fill(color);
                self.show();
            }
        }
    }
}
