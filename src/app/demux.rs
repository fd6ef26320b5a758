//! Bus command demultiplexer.
//!
//! Maps identifier-keyed frames onto Signal Model mutations.  `on_frame`
//! only touches atomics and the mutex-guarded Fault Latch, so it may run
//! from a receive interrupt while the controller is mid-pass.

use log::{debug, error, warn};

use super::commands::BusCommand;
use super::ports::{BusPort, ByteStore};
use crate::fault_latch::FaultLatch;
use crate::signals::Signals;

pub struct CommandDemux<'a, S> {
    signals: &'a Signals,
    latch: &'a FaultLatch<S>,
    mech_brake_command: bool,
}

impl<'a, S: ByteStore> CommandDemux<'a, S> {
    pub fn new(signals: &'a Signals, latch: &'a FaultLatch<S>, mech_brake_command: bool) -> Self {
        Self {
            signals,
            latch,
            mech_brake_command,
        }
    }

    /// Handle one received frame.  The payload is not interpreted.
    /// Unrecognised identifiers are dropped without a log line.
    pub fn on_frame(&self, id: u32, _payload: &[u8]) -> Option<BusCommand> {
        let cmd = BusCommand::from_id(id, self.mech_brake_command)?;
        match cmd {
            BusCommand::LeftToggle => {
                let on = self.signals.toggle_left();
                debug!("bus: left -> {}", on);
            }
            BusCommand::RightToggle => {
                let on = self.signals.toggle_right();
                debug!("bus: right -> {}", on);
            }
            BusCommand::HazardToggle => {
                let on = self.signals.toggle_hazard();
                debug!("bus: hazard -> {}", on);
            }
            BusCommand::FaultTrip => {
                warn!("bus: fault trip received");
                self.signals.set_fault_latched(true);
                // Persisted before returning, even when already tripped.
                if let Err(e) = self.latch.trip() {
                    error!("bus: fault latch not persisted: {}", e);
                }
            }
            BusCommand::MechBrakeToggle => {
                let on = self.signals.toggle_mech_brake();
                debug!("bus: mech brake -> {}", on);
            }
        }
        Some(cmd)
    }

    /// Drain every frame currently waiting on `bus`.  Returns the number
    /// of frames consumed, recognised or not.
    pub fn poll(&self, bus: &mut impl BusPort) -> usize {
        let mut n = 0;
        while let Some(frame) = bus.try_receive() {
            self.on_frame(frame.id, &frame.data);
            n += 1;
        }
        n
    }
}
