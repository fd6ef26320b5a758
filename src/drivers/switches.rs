//! Debounced switch bank.
//!
//! Owns one input pin and one [`Debouncer`] per physical switch and maps
//! accepted edges onto the Signal Model.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use heapless::Vec;
use log::debug;

use super::debounce::Debouncer;
use crate::pins::Switch;
use crate::signals::Signals;

struct Channel<P> {
    switch: Switch,
    pin: P,
    debouncer: Debouncer,
}

/// The six harness switches, scanned in [`Switch::ALL`] order.
pub struct SwitchBank<P> {
    channels: [Channel<P>; Switch::COUNT],
}

/// Pins for a [`SwitchBank`], one per switch.
pub struct SwitchPins<P> {
    pub left: P,
    pub right: P,
    pub hazard: P,
    pub head: P,
    pub regen: P,
    pub mech: P,
}

impl<P: InputPin> SwitchBank<P> {
    pub fn new(pins: SwitchPins<P>, debounce_ms: u32) -> Self {
        let ch = |switch, pin| Channel {
            switch,
            pin,
            debouncer: Debouncer::new(debounce_ms),
        };
        Self {
            channels: [
                ch(Switch::Left, pins.left),
                ch(Switch::Right, pins.right),
                ch(Switch::Hazard, pins.hazard),
                ch(Switch::Head, pins.head),
                ch(Switch::Regen, pins.regen),
                ch(Switch::Mech, pins.mech),
            ],
        }
    }

    /// Sample every switch once and apply accepted edges to `signals`.
    /// Returns the edges accepted in this scan.
    pub fn sample_all(
        &mut self,
        signals: &Signals,
        delay: &mut impl DelayNs,
    ) -> Vec<(Switch, bool), { Switch::COUNT }> {
        let mut edges = Vec::new();
        for ch in &mut self.channels {
            let sample = ch.debouncer.sample(&mut ch.pin, &mut *delay);
            if sample.changed {
                debug!("switch {} -> {}", ch.switch, sample.level);
                apply_edge(signals, ch.switch, sample.level);
                // Cannot overflow: one entry per channel.
                let _ = edges.push((ch.switch, sample.level));
            }
        }
        edges
    }

    /// Stable level of one switch.
    pub fn stable_level(&self, switch: Switch) -> bool {
        self.channels[switch as usize].debouncer.stable_level()
    }
}

/// Map an accepted switch level onto its Signal Model flag.
fn apply_edge(signals: &Signals, switch: Switch, level: bool) {
    match switch {
        Switch::Left => signals.set_left(level),
        Switch::Right => signals.set_right(level),
        Switch::Hazard => {
            signals.set_hazard(level);
        }
        Switch::Head => signals.set_headlight(level),
        Switch::Regen => signals.set_regen_brake(level),
        Switch::Mech => signals.set_mech_brake(level),
    }
}
