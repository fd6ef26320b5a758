//! Inbound bus commands.
//!
//! The identifier table is the only wire protocol this controller speaks
//! and must match existing senders exactly.  Payloads are carried but not
//! interpreted.

use heapless::Vec;

// ── Identifier table ──────────────────────────────────────────

pub const COMMAND_LEFT_SIGNAL_ID: u32 = 0x300;
pub const COMMAND_RIGHT_SIGNAL_ID: u32 = 0x301;
pub const COMMAND_HAZARD_SIGNAL_ID: u32 = 0x302;
pub const COMMAND_FAULT_TRIP_ID: u32 = 0x303;
/// Only recognised when `ControllerConfig::mech_brake_command` is set.
pub const COMMAND_MECH_BRAKE_ID: u32 = 0x304;

/// Classic CAN data field limit.
pub const MAX_PAYLOAD: usize = 8;

/// One received bus frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: u32,
    pub data: Vec<u8, MAX_PAYLOAD>,
}

impl Frame {
    /// A frame with an empty data field.
    pub fn new(id: u32) -> Self {
        Self { id, data: Vec::new() }
    }

    /// A frame carrying `payload`, truncated to [`MAX_PAYLOAD`] bytes.
    pub fn with_payload(id: u32, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_PAYLOAD);
        let mut data = Vec::new();
        // Cannot fail: `len` is bounded by the capacity.
        let _ = data.extend_from_slice(&payload[..len]);
        Self { id, data }
    }
}

/// Logical commands carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCommand {
    LeftToggle,
    RightToggle,
    HazardToggle,
    FaultTrip,
    MechBrakeToggle,
}

impl BusCommand {
    /// Decode an identifier.  Unknown identifiers yield `None`.
    pub fn from_id(id: u32, mech_brake_command: bool) -> Option<Self> {
        match id {
            COMMAND_LEFT_SIGNAL_ID => Some(Self::LeftToggle),
            COMMAND_RIGHT_SIGNAL_ID => Some(Self::RightToggle),
            COMMAND_HAZARD_SIGNAL_ID => Some(Self::HazardToggle),
            COMMAND_FAULT_TRIP_ID => Some(Self::FaultTrip),
            COMMAND_MECH_BRAKE_ID if mech_brake_command => Some(Self::MechBrakeToggle),
            _ => None,
        }
    }

    /// The identifier senders use for this command.
    pub const fn id(self) -> u32 {
        match self {
            Self::LeftToggle => COMMAND_LEFT_SIGNAL_ID,
            Self::RightToggle => COMMAND_RIGHT_SIGNAL_ID,
            Self::HazardToggle => COMMAND_HAZARD_SIGNAL_ID,
            Self::FaultTrip => COMMAND_FAULT_TRIP_ID,
            Self::MechBrakeToggle => COMMAND_MECH_BRAKE_ID,
        }
    }
}
