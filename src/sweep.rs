//! Power-on strip test pattern.
//!
//! Ramps each primary from 0 to 250 in steps of 50, red then green then blue,
//! framed by an all-off frame at each end. One frame per [`SWEEP_FRAME_MS`].
//! The sweep is polled like everything else, so the control loop keeps running
//! while it plays.
//!
//! [`SWEEP_FRAME_MS`]: crate::config::SWEEP_FRAME_MS

use crate::pixel::Pixel;
use crate::time::TimeInstant;
use crate::timer::SoftTimer;

const RAMP_STEP: u8 = 50;
const RAMP_STEPS: u8 = 6;
const CHANNELS: u8 = 3;

/// Total frames in the sweep, including both blank frames.
pub const SWEEP_FRAMES: u8 = RAMP_STEPS * CHANNELS + 2;

/// Color of sweep frame `index`, or `None` past the end.
pub fn frame(index: u8) -> Option<Pixel> {
    match index {
        0 => Some(Pixel::OFF),
        i if i < SWEEP_FRAMES - 1 => {
            let step = i - 1;
            let level = (step % RAMP_STEPS) * RAMP_STEP;
            Some(match step / RAMP_STEPS {
                0 => Pixel::new(level, 0, 0),
                1 => Pixel::new(0, level, 0),
                _ => Pixel::new(0, 0, level),
            })
        }
        i if i == SWEEP_FRAMES - 1 => Some(Pixel::OFF),
        _ => None,
    }
}

/// Plays the sweep one frame at a time.
#[derive(Debug, Clone, Copy)]
pub struct StartupSweep<I: TimeInstant> {
    timer: SoftTimer<I>,
    next: u8,
}

impl<I: TimeInstant> StartupSweep<I> {
    /// Creates a sweep that shows its first frame on the first poll.
    pub fn new(frame_interval: I::Duration) -> Self {
        Self {
            timer: SoftTimer::new(frame_interval),
            next: 0,
        }
    }

    /// Returns the next frame to show once its slot is due.
    ///
    /// The first frame is returned immediately; later frames each wait one
    /// interval. Returns `None` between frames and after the last one.
    pub fn poll(&mut self, now: I) -> Option<Pixel> {
        if self.is_done() {
            return None;
        }

        let due = if self.next == 0 {
            let _ = self.timer.poll(now);
            true
        } else if self.timer.poll(now) {
            let _ = self.timer.poll(now);
            true
        } else {
            false
        };

        if !due {
            return None;
        }

        let color = frame(self.next);
        self.next += 1;
        color
    }

    /// Returns true once every frame has been shown.
    pub fn is_done(&self) -> bool {
        self.next >= SWEEP_FRAMES
    }
}
