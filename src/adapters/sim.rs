//! Simulation pins and delays.
//!
//! Stand-ins for board GPIO and busy-wait delays so the full controller
//! runs on the host.  [`SimPin`] is a cloneable handle onto one shared
//! level; the bench (or a test) keeps one clone and hands the other to the
//! controller.  [`SimDelay`] advances a [`SimClock`] instead of sleeping;
//! [`StdDelay`] really sleeps.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};

// ── Pins ──────────────────────────────────────────────────────

/// Error raised by a [`SimPin`] switched into failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct PinState {
    level: AtomicBool,
    edges: AtomicU32,
    failing: AtomicBool,
}

/// A simulated GPIO, usable as input or output.
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    state: Arc<PinState>,
}

impl SimPin {
    pub fn new(level: bool) -> Self {
        let pin = Self::default();
        pin.state.level.store(level, Ordering::Release);
        pin
    }

    /// Current level, as seen from outside the controller.
    pub fn level(&self) -> bool {
        self.state.level.load(Ordering::Acquire)
    }

    /// Drive the level from outside (a switch being thrown).
    pub fn set_level(&self, level: bool) {
        self.write(level);
    }

    /// Number of level changes since creation.
    pub fn edges(&self) -> u32 {
        self.state.edges.load(Ordering::Acquire)
    }

    /// Make reads and writes fail.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::Release);
    }

    fn check(&self) -> Result<(), SimPinError> {
        if self.state.failing.load(Ordering::Acquire) {
            Err(SimPinError)
        } else {
            Ok(())
        }
    }

    fn write(&self, level: bool) {
        if self.state.level.swap(level, Ordering::AcqRel) != level {
            self.state.edges.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.write(true);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

// ── Time ──────────────────────────────────────────────────────

/// Shared simulated monotonic clock (nanoseconds).
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    ns: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.ns.load(Ordering::Acquire) / 1_000_000
    }

    pub fn advance_ns(&self, ns: u64) {
        self.ns.fetch_add(ns, Ordering::AcqRel);
    }
}

/// Delay that advances a [`SimClock`] and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct SimDelay {
    clock: SimClock,
}

impl SimDelay {
    pub fn new(clock: SimClock) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }
}

/// Delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
