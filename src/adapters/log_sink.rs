//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events through `log`.
//! On the bench that means `env_logger` on stderr.

use log::{info, warn};

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            ControllerEvent::FaultEntered => {
                warn!("FAULT | entered, lamps off, strobe running");
            }
            ControllerEvent::FaultLatchCleared => {
                info!("FAULT | latch confirmed and cleared");
            }
            ControllerEvent::SwitchChanged { switch, level } => {
                info!("SWITCH | {} -> {}", switch, if *level { "ON" } else { "OFF" });
            }
        }
    }
}

/// Sink that keeps every event, for tests and the bench summary.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ControllerEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, wanted: &ControllerEvent) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControllerEvent) {
        self.events.push(*event);
    }
}
