//! Blocking switch debouncer.
//!
//! ## Algorithm
//!
//! Each call compares the instantaneous level with the last accepted
//! (stable) level.  On a mismatch the candidate must be re-read at 1 ms
//! intervals for the whole window; any reversion discards it.
//!
//! ```text
//!  raw   ‾‾‾‾‾|_|‾|___________________
//!  stable ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|___   (after window of continuous low)
//! ```
//!
//! The wait blocks the caller for up to the window.  At the low input
//! change rate of a lighting harness this stall is acceptable.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::warn;

/// Sampling resolution inside the window.
const SAMPLE_STEP_MS: u32 = 1;

/// Result of one [`Debouncer::sample`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Stable level after this call.
    pub level: bool,
    /// True if this call accepted a new stable level.
    pub changed: bool,
}

/// Per-switch debounce record.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    raw_level: bool,
    stable_level: bool,
    pending: bool,
    window_ms: u32,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            raw_level: false,
            stable_level: false,
            pending: false,
            window_ms,
        }
    }

    /// Last accepted level.
    pub fn stable_level(&self) -> bool {
        self.stable_level
    }

    /// Last instantaneous level read.
    pub fn raw_level(&self) -> bool {
        self.raw_level
    }

    /// True while a candidate is being confirmed.  Only observable from
    /// inside a sample call; false between calls.
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Sample `pin`, confirming any level change over the full window.
    pub fn sample<P: InputPin>(&mut self, pin: &mut P, delay: &mut impl DelayNs) -> Sample {
        self.raw_level = read_level(pin);
        if self.raw_level == self.stable_level {
            return self.settle(false);
        }

        let candidate = self.raw_level;
        self.pending = true;
        let mut held_ms = 0;
        while held_ms < self.window_ms {
            delay.delay_ms(SAMPLE_STEP_MS);
            held_ms += SAMPLE_STEP_MS;
            self.raw_level = read_level(pin);
            if self.raw_level != candidate {
                return self.settle(false);
            }
        }

        self.stable_level = candidate;
        self.settle(true)
    }

    fn settle(&mut self, changed: bool) -> Sample {
        self.pending = false;
        Sample {
            level: self.stable_level,
            changed,
        }
    }
}

/// A failed read counts as inactive.
fn read_level<P: InputPin>(pin: &mut P) -> bool {
    match pin.is_high() {
        Ok(level) => level,
        Err(e) => {
            warn!("debounce: switch read failed ({:?}), treating as low", e);
            false
        }
    }
}
