//! Shared Signal Model.
//!
//! A fixed set of boolean flags written by the switch sampler, the bus
//! demultiplexer and the tick source, and read by the controller.  Each
//! flag is an independent atomic; no multi-flag transaction is offered.
//!
//! ```text
//! ┌──────────────┐
//! │ SwitchBank   │──┐
//! ├──────────────┤  │   ┌─────────────┐     ┌──────────────┐
//! │ CommandDemux │──┼──▶│   Signals   │────▶│  Controller  │
//! ├──────────────┤  │   │  (atomics)  │     │  (one pass)  │
//! │ TickSource   │──┘   └─────────────┘     └──────────────┘
//! └──────────────┘
//! ```
//!
//! Invariant: `left` and `right` are never both set by a single writer.
//! Setting one clears the other first.  Two writers racing on the pair may
//! briefly leave both set; the next event on either side resolves it.

use core::sync::atomic::{AtomicBool, Ordering};

/// Process-wide signal flags.
#[derive(Debug)]
pub struct Signals {
    left: AtomicBool,
    right: AtomicBool,
    hazard: AtomicBool,
    headlight: AtomicBool,
    regen_brake: AtomicBool,
    mech_brake: AtomicBool,
    fault_latched: AtomicBool,
    blink_due: AtomicBool,
    /// Pending request to force both turn outputs low, raised on hazard
    /// activation and consumed by the controller at the start of a pass.
    turn_reset: AtomicBool,
}

/// Point-in-time copy of every flag, taken once per controller pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalSnapshot {
    pub left: bool,
    pub right: bool,
    pub hazard: bool,
    pub headlight: bool,
    pub regen_brake: bool,
    pub mech_brake: bool,
    pub fault_latched: bool,
    pub blink_due: bool,
}

impl Signals {
    /// All flags false except `fault_latched`, which is seeded from the
    /// persistent Fault Latch.
    pub const fn new(fault_latched: bool) -> Self {
        Self {
            left: AtomicBool::new(false),
            right: AtomicBool::new(false),
            hazard: AtomicBool::new(false),
            headlight: AtomicBool::new(false),
            regen_brake: AtomicBool::new(false),
            mech_brake: AtomicBool::new(false),
            fault_latched: AtomicBool::new(fault_latched),
            blink_due: AtomicBool::new(false),
            turn_reset: AtomicBool::new(false),
        }
    }

    // ── Turn signals ──────────────────────────────────────────

    pub fn left(&self) -> bool {
        self.left.load(Ordering::Acquire)
    }

    pub fn right(&self) -> bool {
        self.right.load(Ordering::Acquire)
    }

    /// Set the left flag; setting it clears `right`.
    pub fn set_left(&self, on: bool) {
        if on {
            self.right.store(false, Ordering::Release);
        }
        self.left.store(on, Ordering::Release);
    }

    /// Set the right flag; setting it clears `left`.
    pub fn set_right(&self, on: bool) {
        if on {
            self.left.store(false, Ordering::Release);
        }
        self.right.store(on, Ordering::Release);
    }

    /// Flip `left`, returning the new value.
    pub fn toggle_left(&self) -> bool {
        let on = !self.left();
        self.set_left(on);
        on
    }

    /// Flip `right`, returning the new value.
    pub fn toggle_right(&self) -> bool {
        let on = !self.right();
        self.set_right(on);
        on
    }

    // ── Hazard ────────────────────────────────────────────────

    pub fn hazard(&self) -> bool {
        self.hazard.load(Ordering::Acquire)
    }

    /// Set the hazard flag.  A false → true edge raises the turn-output
    /// reset request.  Returns `true` on that edge.
    pub fn set_hazard(&self, on: bool) -> bool {
        let was = self.hazard.swap(on, Ordering::AcqRel);
        let activated = on && !was;
        if activated {
            self.turn_reset.store(true, Ordering::Release);
        }
        activated
    }

    /// Flip `hazard`, returning the new value.
    pub fn toggle_hazard(&self) -> bool {
        let on = !self.hazard();
        self.set_hazard(on);
        on
    }

    /// Consume a pending turn-output reset request.
    pub fn take_turn_reset(&self) -> bool {
        self.turn_reset.swap(false, Ordering::AcqRel)
    }

    // ── Headlight and brakes ──────────────────────────────────

    pub fn headlight(&self) -> bool {
        self.headlight.load(Ordering::Acquire)
    }

    pub fn set_headlight(&self, on: bool) {
        self.headlight.store(on, Ordering::Release);
    }

    pub fn regen_brake(&self) -> bool {
        self.regen_brake.load(Ordering::Acquire)
    }

    pub fn set_regen_brake(&self, on: bool) {
        self.regen_brake.store(on, Ordering::Release);
    }

    pub fn mech_brake(&self) -> bool {
        self.mech_brake.load(Ordering::Acquire)
    }

    pub fn set_mech_brake(&self, on: bool) {
        self.mech_brake.store(on, Ordering::Release);
    }

    /// Flip `mech_brake`, returning the new value.
    pub fn toggle_mech_brake(&self) -> bool {
        !self.mech_brake.fetch_xor(true, Ordering::AcqRel)
    }

    // ── Fault and blink ───────────────────────────────────────

    pub fn fault_latched(&self) -> bool {
        self.fault_latched.load(Ordering::Acquire)
    }

    pub fn set_fault_latched(&self, on: bool) {
        self.fault_latched.store(on, Ordering::Release);
    }

    pub fn blink_due(&self) -> bool {
        self.blink_due.load(Ordering::Acquire)
    }

    pub fn set_blink_due(&self) {
        self.blink_due.store(true, Ordering::Release);
    }

    pub fn clear_blink_due(&self) {
        self.blink_due.store(false, Ordering::Release);
    }

    /// Copy every flag.  Flags are read one at a time; a concurrent writer
    /// may land between two reads.
    pub fn snapshot(&self) -> SignalSnapshot {
        SignalSnapshot {
            left: self.left(),
            right: self.right(),
            hazard: self.hazard(),
            headlight: self.headlight(),
            regen_brake: self.regen_brake(),
            mech_brake: self.mech_brake(),
            fault_latched: self.fault_latched(),
            blink_due: self.blink_due(),
        }
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new(false)
    }
}
