//! Time abstraction traits for platform-agnostic timing.
//!
//! The control core never reads a clock directly. Everything that needs the
//! current time is handed a [`TimeSource`], and every interval is measured with
//! [`TimeInstant::duration_since`].
//!
//! [`Tick`] and [`Millis`] model the usual HAL millisecond counter: a free-running
//! `u32` that wraps after about 49.7 days.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq + core::fmt::Debug {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by a wrapping counter must use wrapping
    /// subtraction so that intervals spanning a rollover stay correct.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Millisecond tick count of a free-running, wrapping `u32` counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

/// A span of milliseconds measured on a [`Tick`] counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Tick {
    /// Returns the tick advanced by `millis`, wrapping on overflow.
    #[inline]
    pub const fn wrapping_add(self, millis: Millis) -> Self {
        Tick(self.0.wrapping_add(millis.0))
    }
}

impl TimeDuration for Millis {
    const ZERO: Self = Millis(0);

    #[inline]
    fn as_millis(&self) -> u64 {
        u64::from(self.0)
    }

    #[inline]
    fn from_millis(millis: u64) -> Self {
        Millis(u32::try_from(millis).unwrap_or(u32::MAX))
    }
}

impl TimeInstant for Tick {
    type Duration = Millis;

    #[inline]
    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Millis(self.0.wrapping_sub(earlier.0))
    }
}
