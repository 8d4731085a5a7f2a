//! Color helpers.
//!
//! Brightness scaling for [`Pixel`] values, going through `palette` for the
//! float conversion and 8-bit quantisation.

use crate::pixel::Pixel;
use palette::Srgb;

/// Scales every channel of `pixel` by `level / 255`.
///
/// `level` 255 leaves the pixel unchanged and 0 turns it off.
pub fn scale(pixel: Pixel, level: u8) -> Pixel {
    let factor = f32::from(level) / 255.0;
    let color: Srgb<f32> = Srgb::<u8>::from(pixel).into_format();
    Srgb::new(color.red * factor, color.green * factor, color.blue * factor)
        .into_format::<u8>()
        .into()
}
