//! Pixel buffer and single-wire pulse encoder for WS2812-class LED strips.
//!
//! Each LED latches 24 bits, green first, then red, then blue, most significant
//! bit first. A bit is sent as one PWM period whose high time selects its
//! value. [`PixelStrip::encode`] turns the buffer into one compare value per
//! bit, ready for a timer+DMA (or PIO, RMT, SPI) backend implementing
//! [`PulseTransmitter`].

use heapless::Vec;
use palette::Srgb;

/// Bits latched by each LED.
pub const BITS_PER_PIXEL: usize = 24;

/// PWM period, in timer counts, of one bit slot (800 kHz at 72 MHz).
pub const PULSE_PERIOD: u16 = 90;

/// Compare value sent for a `1` bit (about 68% duty).
pub const BIT_ONE_PULSE: u16 = 61;

/// Compare value sent for a `0` bit (about 32% duty).
pub const BIT_ZERO_PULSE: u16 = 29;

/// Pulse buffer capacity needed for a strip of `strip_len` pixels.
pub const fn pulse_buffer_len(strip_len: usize) -> usize {
    strip_len * BITS_PER_PIXEL
}

/// One LED color.
///
/// The packed form puts green in bits 23..16, red in 15..8 and blue in 7..0,
/// which is the order the LED expects on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pixel {
    /// Red intensity.
    pub red: u8,
    /// Green intensity.
    pub green: u8,
    /// Blue intensity.
    pub blue: u8,
}

impl Pixel {
    /// All channels off.
    pub const OFF: Self = Self::new(0, 0, 0);

    /// Creates a pixel from channel intensities.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the 24-bit wire value.
    pub const fn packed(self) -> u32 {
        ((self.green as u32) << 16) | ((self.red as u32) << 8) | (self.blue as u32)
    }

    /// Builds a pixel from a wire value. Bits above 23 are ignored.
    pub const fn from_packed(value: u32) -> Self {
        Self {
            green: (value >> 16) as u8,
            red: (value >> 8) as u8,
            blue: value as u8,
        }
    }
}

impl From<Srgb<u8>> for Pixel {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<Pixel> for Srgb<u8> {
    fn from(pixel: Pixel) -> Self {
        Srgb::new(pixel.red, pixel.green, pixel.blue)
    }
}

/// Errors raised while filling or encoding a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The pulse buffer is smaller than `24 * strip length`.
    CapacityExceeded {
        /// Pulses the strip needs.
        required: usize,
        /// Pulses the buffer holds.
        capacity: usize,
    },

    /// Pixel index past the end of the strip.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Strip length.
        len: usize,
    },
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::CapacityExceeded { required, capacity } => {
                write!(
                    f,
                    "pulse buffer too small: {} pulses required, capacity {}",
                    required, capacity
                )
            }
            EncodeError::IndexOutOfRange { index, len } => {
                write!(f, "pixel index {} out of range for strip of {}", index, len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Trait for abstracting the pulse generator that drives the data line.
///
/// Transmission is fire-and-forget: the encoder does not wait for completion,
/// and the slice is only borrowed for the duration of the call. Backends that
/// stream asynchronously must copy it.
pub trait PulseTransmitter {
    /// Starts sending one compare value per bit slot.
    fn transmit(&mut self, pulses: &[u16]);
}

/// A strip of `N` pixels with room for `B` encoded pulses.
///
/// Use [`pulse_buffer_len`] for `B`:
///
/// ```
/// use spinflow::pixel::{PixelStrip, pulse_buffer_len};
///
/// let strip = PixelStrip::<8, { pulse_buffer_len(8) }>::new();
/// assert_eq!(strip.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct PixelStrip<const N: usize, const B: usize> {
    pixels: [Pixel; N],
    pulses: Vec<u16, B>,
}

impl<const N: usize, const B: usize> PixelStrip<N, B> {
    /// Creates a strip with every pixel off.
    pub fn new() -> Self {
        Self {
            pixels: [Pixel::OFF; N],
            pulses: Vec::new(),
        }
    }

    /// Number of pixels.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns true for a zero-length strip.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Current pixel colors in strip order.
    pub fn pixels(&self) -> &[Pixel; N] {
        &self.pixels
    }

    /// Mutable access to the pixel buffer.
    pub fn pixels_mut(&mut self) -> &mut [Pixel; N] {
        &mut self.pixels
    }

    /// Replaces every pixel with `f(pixel)`.
    pub fn set_all<F: FnMut(Pixel) -> Pixel>(&mut self, mut f: F) {
        for pixel in self.pixels.iter_mut() {
            *pixel = f(*pixel);
        }
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Pixel) {
        self.set_all(|_| color);
    }

    /// Sets a single pixel.
    pub fn set_pixel(&mut self, index: usize, color: Pixel) -> Result<(), EncodeError> {
        let slot = self
            .pixels
            .get_mut(index)
            .ok_or(EncodeError::IndexOutOfRange { index, len: N })?;
        *slot = color;
        Ok(())
    }

    /// Sets every pixel to pure red at `level`.
    pub fn set_red(&mut self, level: u8) {
        self.fill(Pixel::new(level, 0, 0));
    }

    /// Sets every pixel to pure green at `level`.
    pub fn set_green(&mut self, level: u8) {
        self.fill(Pixel::new(0, level, 0));
    }

    /// Sets every pixel to pure blue at `level`.
    pub fn set_blue(&mut self, level: u8) {
        self.fill(Pixel::new(0, 0, level));
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.fill(Pixel::OFF);
    }

    /// Expands the buffer into pulse codes, strip order then MSB first.
    ///
    /// Returns exactly `24 * N` codes.
    pub fn encode(&mut self) -> Result<&[u16], EncodeError> {
        let required = pulse_buffer_len(N);
        if required > B {
            return Err(EncodeError::CapacityExceeded {
                required,
                capacity: B,
            });
        }

        self.pulses.clear();
        for pixel in self.pixels.iter() {
            let value = pixel.packed();
            for bit in (0..BITS_PER_PIXEL).rev() {
                let code = if value & (1 << bit) != 0 {
                    BIT_ONE_PULSE
                } else {
                    BIT_ZERO_PULSE
                };
                self.pulses
                    .push(code)
                    .map_err(|_| EncodeError::CapacityExceeded {
                        required,
                        capacity: B,
                    })?;
            }
        }

        Ok(&self.pulses)
    }

    /// Encodes the buffer and hands the pulses to `transmitter`.
    pub fn flush<X: PulseTransmitter>(&mut self, transmitter: &mut X) -> Result<(), EncodeError> {
        let pulses = self.encode()?;
        transmitter.transmit(pulses);
        Ok(())
    }
}

impl<const N: usize, const B: usize> Default for PixelStrip<N, B> {
    fn default() -> Self {
        Self::new()
    }
}
