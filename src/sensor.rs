//! Motion sensor abstraction and rotation classification.

/// Calibrated gyroscope sample, in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Angular rate around the X axis.
    pub gx: i16,
    /// Angular rate around the Y axis.
    pub gy: i16,
    /// Angular rate around the Z axis.
    pub gz: i16,
}

/// Coarse activity level of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// No axis exceeds the threshold.
    Idle,
    /// At least one axis exceeds the threshold.
    Active,
}

/// Rotation direction around the Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Spin {
    /// Below the threshold.
    None,
    /// Counter-clockwise, seen from above.
    Positive,
    /// Clockwise, seen from above.
    Negative,
}

impl SensorReading {
    /// Creates a reading from per-axis rates.
    pub const fn new(gx: i16, gy: i16, gz: i16) -> Self {
        Self { gx, gy, gz }
    }

    /// Classifies overall activity. Any axis whose magnitude exceeds
    /// `threshold` makes the reading active.
    pub fn motion(&self, threshold: i16) -> Motion {
        let limit = threshold.unsigned_abs();
        let active = [self.gx, self.gy, self.gz]
            .iter()
            .any(|rate| rate.unsigned_abs() > limit);

        if active { Motion::Active } else { Motion::Idle }
    }

    /// Classifies rotation around Z. Rates with magnitude below `threshold`
    /// count as no spin, and so does a zero rate whatever the threshold.
    pub fn spin(&self, threshold: i16) -> Spin {
        if self.gz == 0 || self.gz.unsigned_abs() < threshold.unsigned_abs() {
            Spin::None
        } else if self.gz > 0 {
            Spin::Positive
        } else {
            Spin::Negative
        }
    }
}

/// Trait for abstracting the motion sensor hardware.
///
/// Only [`check`](Self::check) and [`sample`](Self::sample) touch the device.
/// Classification is provided on top of [`SensorReading::motion`] and
/// [`SensorReading::spin`]; override it to apply a different rule.
pub trait MotionSensor {
    /// Bus or device error reported by a failed sample.
    type Error: core::fmt::Debug;

    /// Returns true if the sensor answers and reports the expected identity.
    fn check(&mut self) -> bool;

    /// Reads a fresh, calibrated sample.
    fn sample(&mut self) -> Result<SensorReading, Self::Error>;

    /// Classifies overall activity of `reading` against `threshold` in
    /// degrees per second.
    fn classify_motion(&self, reading: &SensorReading, threshold: i16) -> Motion {
        reading.motion(threshold)
    }

    /// Classifies rotation direction of `reading`.
    fn classify_spin(&self, reading: &SensorReading, threshold: i16) -> Spin {
        reading.spin(threshold)
    }
}
