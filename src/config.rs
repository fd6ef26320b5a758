//! Controller timing and feature parameters.
//!
//! One struct replaces the per-variant constants of earlier controller
//! builds.  Values are fixed at startup; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Blink cadence ---
    /// Tick Source period (milliseconds) between blink toggles.
    pub blink_period_ms: u32,

    // --- Switch inputs ---
    /// Continuous-hold window (milliseconds) before a switch level change
    /// is accepted.  Sampled at 1 ms resolution.
    pub debounce_ms: u32,

    // --- Fault strobe ---
    /// Strobe on/off half-period (milliseconds).
    pub strobe_half_period_ms: u32,
    /// Continuous strobe time (milliseconds) after which the Fault Latch
    /// is returned to NORMAL when `fault_confirm_clear` is enabled.
    pub fault_confirm_timeout_ms: u32,
    /// Clear the persistent Fault Latch once per FAULT entry after
    /// `fault_confirm_timeout_ms` of continuous strobe.
    pub fault_confirm_clear: bool,

    // --- Bus ---
    /// Recognise the mechanical-brake toggle command (id 0x304).
    pub mech_brake_command: bool,

    // --- Persistent store ---
    /// Byte address of the Fault Latch in the persistent store.
    pub fault_latch_addr: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            blink_period_ms: 200,

            debounce_ms: 10,

            strobe_half_period_ms: 50,
            fault_confirm_timeout_ms: 2000,
            fault_confirm_clear: false,

            mech_brake_command: true,

            fault_latch_addr: 0x00,
        }
    }
}

impl ControllerConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=5000).contains(&self.blink_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "blink_period_ms must be 10–5000",
            ));
        }
        if !(1..=1000).contains(&self.debounce_ms) {
            return Err(ConfigError::ValidationFailed(
                "debounce_ms must be 1–1000",
            ));
        }
        if !(5..=1000).contains(&self.strobe_half_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "strobe_half_period_ms must be 5–1000",
            ));
        }
        if self.fault_confirm_timeout_ms < self.strobe_half_period_ms {
            return Err(ConfigError::ValidationFailed(
                "fault_confirm_timeout_ms must be >= strobe_half_period_ms",
            ));
        }
        Ok(())
    }
}
