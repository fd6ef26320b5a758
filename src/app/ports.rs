//! Port traits: the hexagonal boundary between the controller core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Pins and delays use the `embedded-hal` traits directly.  The bus
//! transceiver and the persistent byte store are black boxes reached only
//! through [`BusPort`] and [`ByteStore`].

use super::events::ControllerEvent;
use crate::app::commands::Frame;

// ───────────────────────────────────────────────────────────────
// Bus port (driven adapter: transceiver → domain)
// ───────────────────────────────────────────────────────────────

/// Receive side of the command bus.
pub trait BusPort {
    /// Take one pending frame, if any.  Never blocks; an empty receive
    /// buffer is not an error.
    fn try_receive(&mut self) -> Option<Frame>;
}

// ───────────────────────────────────────────────────────────────
// Byte store port (driven adapter: domain ↔ EEPROM / flash)
// ───────────────────────────────────────────────────────────────

/// Single-byte persistent storage.
///
/// Writes MUST be durable before `write_byte` returns: a power loss
/// immediately afterwards must not lose the value.
pub trait ByteStore {
    /// Read the byte at `addr`.
    fn read_byte(&mut self, addr: u8) -> Result<u8, StoreError>;

    /// Write `value` at `addr` synchronously.
    fn write_byte(&mut self, addr: u8, value: u8) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`ControllerEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &ControllerEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ControllerConfig::validate`](crate::config::ControllerConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

/// Errors from [`ByteStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StoreError {}
