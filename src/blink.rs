//! Button-controlled blink rate.
//!
//! [`ButtonBlinker`] toggles an LED slowly until a debounced press arrives,
//! then blinks fast for a fixed number of toggles before falling back to the
//! slow rate.
//!
//! The period changes while the timer is mid-interval, so the blinker's timer
//! uses [`RewritePolicy::Immediate`]: the new period is measured from the start
//! of the interval already running.

use crate::time::{TimeDuration, TimeInstant};
use crate::timer::{RewritePolicy, SoftTimer};

/// Slow blink period.
pub const RELEASED_PERIOD_MS: u32 = 500;

/// Fast blink period after a press.
pub const PRESSED_PERIOD_MS: u32 = 100;

/// Fast toggles shown per press. The blinker leaves fast mode once this
/// count is exceeded.
pub const PRESSED_TOGGLES: u32 = 10;

/// Blink mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkMode {
    /// Slow blinking, waiting for a press.
    Released,
    /// Fast blinking after a press.
    Pressed,
}

/// Blink-rate state machine for a single LED.
#[derive(Debug, Clone, Copy)]
pub struct ButtonBlinker<I: TimeInstant> {
    timer: SoftTimer<I>,
    mode: BlinkMode,
    toggles: u32,
    lit: bool,
}

impl<I: TimeInstant> ButtonBlinker<I> {
    /// Creates a blinker in slow mode with the LED off.
    pub fn new() -> Self {
        Self {
            timer: SoftTimer::with_policy(period::<I>(RELEASED_PERIOD_MS), RewritePolicy::Immediate),
            mode: BlinkMode::Released,
            toggles: 0,
            lit: false,
        }
    }

    /// Advances the blinker. `key_pressed` is the debounced press event for
    /// this iteration, typically from [`DebounceFsm::read_key`].
    ///
    /// Returns true if the LED toggled.
    ///
    /// [`DebounceFsm::read_key`]: crate::debounce::DebounceFsm::read_key
    pub fn update(&mut self, key_pressed: bool, now: I) -> bool {
        let toggled = self.timer.poll(now);
        if toggled {
            self.lit = !self.lit;
        }

        match self.mode {
            BlinkMode::Released => {
                if key_pressed {
                    log::info!("Button Pressed");
                    self.timer.rewrite(period::<I>(PRESSED_PERIOD_MS));
                    self.mode = BlinkMode::Pressed;
                    self.toggles = 0;
                }
            }
            BlinkMode::Pressed => {
                if toggled {
                    self.toggles += 1;
                }
                if self.toggles > PRESSED_TOGGLES {
                    self.timer.rewrite(period::<I>(RELEASED_PERIOD_MS));
                    self.mode = BlinkMode::Released;
                }
            }
        }

        toggled
    }

    /// Returns the current mode.
    pub fn mode(&self) -> BlinkMode {
        self.mode
    }

    /// Returns true while the LED is on.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl<I: TimeInstant> Default for ButtonBlinker<I> {
    fn default() -> Self {
        Self::new()
    }
}

fn period<I: TimeInstant>(ms: u32) -> I::Duration {
    I::Duration::from_millis(u64::from(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Tick;

    #[test]
    fn press_switches_to_fast_blinking_then_back() {
        let mut blinker = ButtonBlinker::<Tick>::new();
        blinker.update(false, Tick(0));
        blinker.update(true, Tick(10));
        assert_eq!(blinker.mode(), BlinkMode::Pressed);

        // Running interval started at 0 now expires after 100 ms.
        assert!(!blinker.update(false, Tick(99)));
        assert!(blinker.update(false, Tick(100)));

        let mut now = 100;
        let mut toggles = 1;
        while blinker.mode() == BlinkMode::Pressed {
            // restart the interval, then let it expire
            blinker.update(false, Tick(now));
            now += 100;
            if blinker.update(false, Tick(now)) {
                toggles += 1;
            }
            assert!(toggles <= PRESSED_TOGGLES + 1);
        }
        assert_eq!(toggles, PRESSED_TOGGLES + 1);
        assert_eq!(blinker.mode(), BlinkMode::Released);
    }
}
