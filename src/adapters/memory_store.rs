//! In-memory byte store.
//!
//! Implements [`ByteStore`] over a 256-byte array that starts erased
//! (`0xFF`), like a fresh EEPROM.  Used by the host bench and by tests;
//! a failure switch lets tests exercise the store error paths.

use crate::app::ports::{ByteStore, StoreError};

const SIZE: usize = 256;

#[derive(Debug, Clone)]
pub struct MemoryStore {
    bytes: [u8; SIZE],
    writes: usize,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            bytes: [0xFF; SIZE],
            writes: 0,
            failing: false,
        }
    }

    /// Pre-load `value` at `addr` (builder style).
    pub fn with_byte(mut self, addr: u8, value: u8) -> Self {
        self.bytes[addr as usize] = value;
        self
    }

    /// Make every subsequent read and write fail with `IoError`.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Inspect a byte without going through the port.
    pub fn peek(&self, addr: u8) -> u8 {
        self.bytes[addr as usize]
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore for MemoryStore {
    fn read_byte(&mut self, addr: u8) -> Result<u8, StoreError> {
        if self.failing {
            return Err(StoreError::IoError);
        }
        Ok(self.bytes[addr as usize])
    }

    fn write_byte(&mut self, addr: u8, value: u8) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::IoError);
        }
        self.bytes[addr as usize] = value;
        self.writes += 1;
        Ok(())
    }
}
