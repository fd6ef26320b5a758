//! Persistent Fault Latch.
//!
//! One byte in the persistent store records whether a safety trip has
//! occurred.  It is read once at boot and written synchronously on every
//! transition, so a power loss right after a trip still boots into FAULT.
//!
//! ## Value encoding
//!
//! | Byte   | Meaning                               |
//! |--------|---------------------------------------|
//! | `0x00` | NORMAL                                |
//! | `0x01` | TRIPPED                               |
//! | `0xFF` | erased cell, never written → NORMAL   |
//! | other  | corrupt → TRIPPED (fail-safe)         |
//!
//! The store sits behind a critical-section mutex: the bus handler trips
//! the latch from interrupt context while the control loop may clear it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{error, info, warn};

use crate::app::ports::{ByteStore, StoreError};

const ERASED: u8 = 0xFF;

/// The two legal latch values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LatchState {
    Normal = 0x00,
    Tripped = 0x01,
}

impl LatchState {
    /// Decode a stored byte.  Only the two legal values decode.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Normal),
            0x01 => Some(Self::Tripped),
            _ => None,
        }
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub const fn is_tripped(self) -> bool {
        matches!(self, Self::Tripped)
    }
}

/// Durable fault flag backed by one byte of a [`ByteStore`].
pub struct FaultLatch<S> {
    addr: u8,
    store: Mutex<CriticalSectionRawMutex, RefCell<S>>,
    boot_state: LatchState,
}

impl<S: ByteStore> FaultLatch<S> {
    /// Read the latch byte once and take ownership of the store.
    pub fn load(mut store: S, addr: u8) -> Self {
        let boot_state = match store.read_byte(addr) {
            Ok(byte) => Self::decode_boot_byte(byte),
            Err(e) => {
                warn!("FaultLatch: read at {:#04x} failed ({}), assuming TRIPPED", addr, e);
                LatchState::Tripped
            }
        };
        info!("FaultLatch: boot state {:?}", boot_state);

        Self {
            addr,
            store: Mutex::new(RefCell::new(store)),
            boot_state,
        }
    }

    fn decode_boot_byte(byte: u8) -> LatchState {
        match LatchState::from_byte(byte) {
            Some(state) => state,
            None if byte == ERASED => {
                info!("FaultLatch: erased cell, treating as NORMAL");
                LatchState::Normal
            }
            None => {
                warn!("FaultLatch: invalid byte {:#04x}, assuming TRIPPED", byte);
                LatchState::Tripped
            }
        }
    }

    /// State read at boot.  Not updated by later writes.
    pub fn boot_state(&self) -> LatchState {
        self.boot_state
    }

    /// Persist TRIPPED.  Written unconditionally, even when already tripped.
    pub fn trip(&self) -> Result<(), StoreError> {
        self.write(LatchState::Tripped)
    }

    /// Persist NORMAL.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.write(LatchState::Normal)
    }

    /// Read the value currently held by the store.
    pub fn stored(&self) -> Result<Option<LatchState>, StoreError> {
        self.store.lock(|cell| {
            cell.borrow_mut()
                .read_byte(self.addr)
                .map(LatchState::from_byte)
        })
    }

    /// Give the store back, e.g. to simulate a power cycle.
    pub fn into_store(self) -> S {
        self.store.into_inner().into_inner()
    }

    fn write(&self, state: LatchState) -> Result<(), StoreError> {
        let result = self
            .store
            .lock(|cell| cell.borrow_mut().write_byte(self.addr, state.as_byte()));
        match result {
            Ok(()) => info!("FaultLatch: persisted {:?}", state),
            Err(e) => error!("FaultLatch: persisting {:?} failed: {}", state, e),
        }
        result
    }
}
