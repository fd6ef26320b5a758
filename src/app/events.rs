//! Outbound controller events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The bench logs them; a
//! test sink records them for assertions.

use crate::fsm::StateId;
use crate::pins::Switch;

/// Structured events emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The controller has started (carries initial state).
    Started(StateId),

    /// The FSM entered FAULT.  Emitted once per session.
    FaultEntered,

    /// The confirmation clear wrote NORMAL to the Fault Latch.
    FaultLatchCleared,

    /// A switch edge survived the debounce window.
    SwitchChanged { switch: Switch, level: bool },
}
