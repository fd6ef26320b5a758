//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard state handlers read from and write to:
//! the signal snapshot for this pass, the commanded lamp levels, the
//! side-effect requests the controller carries out after the handler
//! returns, and the configuration.

use crate::config::ControllerConfig;
use crate::pins::Light;
use crate::signals::SignalSnapshot;

// ---------------------------------------------------------------------------
// Lamp commands (written by state handlers; applied by the controller)
// ---------------------------------------------------------------------------

/// Commanded lamp levels.  Persist across passes so BLINK can toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightCommands {
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub head: bool,
    pub strobe: bool,
}

impl LightCommands {
    /// All lamps off.
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn level(&self, light: Light) -> bool {
        match light {
            Light::Left => self.left,
            Light::Right => self.right,
            Light::Brake => self.brake,
            Light::Head => self.head,
            Light::Strobe => self.strobe,
        }
    }
}

// ---------------------------------------------------------------------------
// Pass requests (reset every pass)
// ---------------------------------------------------------------------------

/// Side effects a handler asks the controller to perform this pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassRequests {
    /// Run the debounced switch scan.
    pub sample_switches: bool,
    /// Clear `blink_due` in the Signal Model.
    pub clear_blink_due: bool,
    /// Return the persistent Fault Latch to NORMAL.
    pub clear_fault_latch: bool,
    /// Hold the outputs for this many milliseconds after applying them.
    pub hold_ms: Option<u32>,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Inputs --
    /// Signal Model as read at the start of this pass.
    pub signals: SignalSnapshot,

    // -- Outputs --
    pub commands: LightCommands,
    pub requests: PassRequests,

    // -- Configuration --
    pub config: ControllerConfig,

    // -- Fault strobe bookkeeping --
    /// Continuous strobe time since FAULT was entered.
    pub strobe_elapsed_ms: u32,
    /// The confirmation clear already ran for this FAULT entry.
    pub fault_clear_done: bool,
}

impl FsmContext {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            signals: SignalSnapshot::default(),
            commands: LightCommands::all_off(),
            requests: PassRequests::default(),
            config,
            strobe_elapsed_ms: 0,
            fault_clear_done: false,
        }
    }

    /// Load this pass's inputs and drop last pass's requests.
    pub fn begin_pass(&mut self, signals: SignalSnapshot) {
        self.signals = signals;
        self.requests = PassRequests::default();
    }

    /// Either brake source lights the brake lamp.
    pub fn brake_requested(&self) -> bool {
        self.signals.regen_brake || self.signals.mech_brake
    }
}
