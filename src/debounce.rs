//! Two-stage button debouncer.
//!
//! Provides [`DebounceFsm`], which turns a raw, bouncing input level into a
//! single press event. An edge is accepted only if the level still holds after
//! a full settle interval, and that check is made on the press edge and again
//! on the release edge.
//!
//! ```text
//!        pressed            settled && pressed
//!   Up ───────────> Falling ───────────────────> Down
//!    ^                 │                           │
//!    │  settled && !pressed                released│
//!    └─────────────────┘                           v
//!    ^                                          Rising
//!    │        settled && released                  │
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! Presses are reported through a read-clears latch ([`DebounceFsm::read_key`]),
//! so each physical press is seen at most once whatever the poll rate.

use crate::time::{TimeInstant, TimeSource};
use crate::timer::SoftTimer;

/// Raw digital input of a button.
pub trait ButtonInput {
    /// Returns true while the contact reads as pressed.
    fn is_pressed(&mut self) -> bool;
}

impl<F: FnMut() -> bool> ButtonInput for F {
    fn is_pressed(&mut self) -> bool {
        self()
    }
}

/// Debouncer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// Released and stable.
    Up,
    /// Press edge seen, waiting for it to settle.
    Falling,
    /// Pressed and stable.
    Down,
    /// Release edge seen, waiting for it to settle.
    Rising,
}

/// Debounces one input using one [`SoftTimer`].
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `P` - Button input implementation type
pub struct DebounceFsm<'t, I: TimeInstant, T: TimeSource<I>, P: ButtonInput> {
    input: P,
    time_source: &'t T,
    timer: SoftTimer<I>,
    state: DebounceState,
    pressed_event: bool,
}

impl<'t, I: TimeInstant, T: TimeSource<I>, P: ButtonInput> DebounceFsm<'t, I, T, P> {
    /// Creates a released debouncer with the given settle interval.
    pub fn new(input: P, time_source: &'t T, settle: I::Duration) -> Self {
        Self {
            input,
            time_source,
            timer: SoftTimer::new(settle),
            state: DebounceState::Up,
            pressed_event: false,
        }
    }

    /// Advances the state machine. Call once per loop iteration.
    pub fn update(&mut self) {
        let now = self.time_source.now();

        match self.state {
            DebounceState::Up => {
                if self.input.is_pressed() {
                    self.state = DebounceState::Falling;
                    // Arms the settle interval; the result is always false here.
                    let _ = self.timer.poll(now);
                }
            }
            DebounceState::Falling => {
                if self.timer.poll(now) {
                    if self.input.is_pressed() {
                        log::debug!("button pressed");
                        self.pressed_event = true;
                        self.state = DebounceState::Down;
                    } else {
                        self.state = DebounceState::Up;
                    }
                }
            }
            DebounceState::Down => {
                if !self.input.is_pressed() {
                    self.state = DebounceState::Rising;
                    let _ = self.timer.poll(now);
                }
            }
            DebounceState::Rising => {
                if self.timer.poll(now) {
                    if self.input.is_pressed() {
                        self.state = DebounceState::Down;
                    } else {
                        log::debug!("button released");
                        self.pressed_event = false;
                        self.state = DebounceState::Up;
                    }
                }
            }
        }
    }

    /// Returns whether a press was confirmed since the last call, and clears it.
    pub fn read_key(&mut self) -> bool {
        core::mem::take(&mut self.pressed_event)
    }

    /// Forces the debouncer back to `Up`, dropping any pending event.
    pub fn reset(&mut self) {
        log::warn!("debounce reset from {:?}", self.state);
        self.state = DebounceState::Up;
        self.pressed_event = false;
        self.timer.arm(self.timer.duration());
    }

    /// Returns the current state.
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Returns true while the button is considered held (`Down` or `Rising`).
    pub fn is_down(&self) -> bool {
        matches!(self.state, DebounceState::Down | DebounceState::Rising)
    }
}
