//! Controller service, the hexagonal core.
//!
//! [`Controller`] owns the FSM, its context, the switch bank, the light
//! outputs and the delay.  It shares the Signal Model and the Fault Latch
//! by reference with the bus demultiplexer and the tick source.
//!
//! ```text
//!  SwitchBank ──▶ ┌────────────────────────┐ ──▶ EventSink
//!     Signals ──▶ │       Controller       │
//!  FaultLatch ◀──▶│   FSM · lamp commands  │ ──▶ LightOutputs
//!                 └────────────────────────┘
//! ```
//!
//! One call to [`Controller::step`] is one full loop pass.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::drivers::lights::{LightOutputs, LightPins};
use crate::drivers::switches::{SwitchBank, SwitchPins};
use crate::error::Result;
use crate::fault_latch::FaultLatch;
use crate::fsm::context::{FsmContext, LightCommands};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::signals::Signals;

use super::events::ControllerEvent;
use super::ports::{ByteStore, EventSink};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<'a, I, O, D, S> {
    fsm: Fsm,
    ctx: FsmContext,
    signals: &'a Signals,
    latch: &'a FaultLatch<S>,
    switches: SwitchBank<I>,
    lights: LightOutputs<O>,
    delay: D,
    fault_reported: bool,
}

impl<'a, I, O, D, S> Controller<'a, I, O, D, S>
where
    I: InputPin,
    O: OutputPin,
    D: DelayNs,
    S: ByteStore,
{
    /// Wire up the controller.  Starts in FAULT when the Signal Model
    /// already carries a latched fault (seeded from the Fault Latch at
    /// boot), otherwise in IDLE.
    ///
    /// Rejects a config that fails [`ControllerConfig::validate`].
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(
        config: ControllerConfig,
        signals: &'a Signals,
        latch: &'a FaultLatch<S>,
        switch_pins: SwitchPins<I>,
        light_pins: LightPins<O>,
        delay: D,
    ) -> Result<Self> {
        config.validate()?;
        let initial = if signals.fault_latched() {
            StateId::Fault
        } else {
            StateId::Idle
        };
        let switches = SwitchBank::new(switch_pins, config.debounce_ms);

        Ok(Self {
            fsm: Fsm::new(build_state_table(), initial),
            ctx: FsmContext::new(config),
            signals,
            latch,
            switches,
            lights: LightOutputs::new(light_pins),
            delay,
            fault_reported: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the initial state's entry action and drive the outputs to
    /// their starting levels.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.fsm.start(&mut self.ctx);
        let state = self.fsm.current_state();
        sink.emit(&ControllerEvent::Started(state));
        self.report_fault_entry(sink);
        info!("Controller started in {:?}", state);
        self.lights.apply(&self.ctx.commands)
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one full loop pass:
    /// snapshot → turn reset → fault check → FSM → side effects → outputs.
    ///
    /// Output failures are returned after every output has been
    /// attempted and any hold has elapsed; the caller logs and continues.
    pub fn step(&mut self, sink: &mut impl EventSink) -> Result<StateId> {
        // 1. Signal snapshot for this pass
        self.ctx.begin_pass(self.signals.snapshot());

        // 2. Hazard activation pre-empts the blink cycle
        if self.signals.take_turn_reset() {
            debug!("hazard activated: turn outputs forced low");
            self.ctx.commands.left = false;
            self.ctx.commands.right = false;
            if let Err(e) = self.lights.apply(&self.ctx.commands) {
                warn!("turn reset not applied: {}", e);
            }
        }

        // 3. A trip seen between passes wins over normal state logic
        if self.ctx.signals.fault_latched && self.fsm.current_state() != StateId::Fault {
            warn!("fault latched, forcing FAULT");
            self.fsm.force_transition(StateId::Fault, &mut self.ctx);
        }

        // 4. FSM pass (pure state logic)
        self.fsm.tick(&mut self.ctx);
        self.report_fault_entry(sink);

        // 5. Requested side effects
        let requests = self.ctx.requests;
        if requests.clear_blink_due {
            self.signals.clear_blink_due();
        }
        if requests.sample_switches {
            for (switch, level) in self.switches.sample_all(self.signals, &mut self.delay) {
                sink.emit(&ControllerEvent::SwitchChanged { switch, level });
            }
        }
        if requests.clear_fault_latch {
            self.clear_fault_latch(sink);
        }

        // 6. Outputs, then hold them for the requested time
        let applied = self.lights.apply(&self.ctx.commands);
        if let Some(ms) = requests.hold_ms {
            self.delay.delay_ms(ms);
        }

        applied.map(|()| self.fsm.current_state())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Lamp levels commanded by the last pass.
    pub fn commands(&self) -> LightCommands {
        self.ctx.commands
    }

    /// Debounced level of one switch.
    pub fn switch_level(&self, switch: crate::pins::Switch) -> bool {
        self.switches.stable_level(switch)
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    // ── Internal ──────────────────────────────────────────────

    fn report_fault_entry(&mut self, sink: &mut impl EventSink) {
        if !self.fault_reported && self.fsm.current_state() == StateId::Fault {
            self.fault_reported = true;
            sink.emit(&ControllerEvent::FaultEntered);
        }
    }

    /// Return the persistent latch to NORMAL.  FAULT itself stays
    /// in force until the next power cycle.
    ///
    /// The clear overwrites whatever the latch holds, including a trip
    /// frame that arrived during this FAULT before the clear ran.  A trip
    /// arriving after the clear is persisted and survives the power cycle.
    fn clear_fault_latch(&mut self, sink: &mut impl EventSink) {
        match self.latch.clear() {
            Ok(()) => {
                self.signals.set_fault_latched(false);
                sink.emit(&ControllerEvent::FaultLatchCleared);
            }
            Err(e) => warn!("confirmation clear failed, latch left TRIPPED: {}", e),
        }
    }
}
