//! Blink Tick Source.
//!
//! Driven from a periodic timer interrupt (1 ms on the reference board).
//! Accumulates elapsed time and, once a full blink period has passed,
//! raises `blink_due` in the Signal Model and toggles the heartbeat LED.
//! It never touches the lamp outputs; blinking belongs to the controller.

use embedded_hal::digital::StatefulOutputPin;
use log::warn;

use crate::signals::Signals;

pub struct TickSource<'a, H> {
    signals: &'a Signals,
    heartbeat: H,
    period_ms: u32,
    elapsed_ms: u32,
}

impl<'a, H: StatefulOutputPin> TickSource<'a, H> {
    pub fn new(signals: &'a Signals, heartbeat: H, period_ms: u32) -> Self {
        Self {
            signals,
            heartbeat,
            period_ms,
            elapsed_ms: 0,
        }
    }

    /// Account for `step_ms` of elapsed time.  Returns `true` if the tick
    /// fired during this call.
    pub fn on_elapsed(&mut self, step_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(step_ms);
        if self.elapsed_ms < self.period_ms {
            return false;
        }

        self.elapsed_ms = 0;
        self.signals.set_blink_due();
        if let Err(e) = self.heartbeat.toggle() {
            warn!("tick: heartbeat toggle failed: {:?}", e);
        }
        true
    }

    /// Time accumulated towards the next fire.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}
