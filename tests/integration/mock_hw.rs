//! Mock hardware for integration tests.
//!
//! Records every lamp write with the simulated time it happened at, so
//! tests can assert on the full output history (strobe cadence, blink
//! phase) without touching real GPIO.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use auxlight::adapters::log_sink::RecordingSink;
use auxlight::adapters::memory_store::MemoryStore;
use auxlight::app::service::Controller;
use auxlight::config::ControllerConfig;
use auxlight::drivers::lights::LightPins;
use auxlight::drivers::switches::SwitchPins;
use auxlight::fault_latch::FaultLatch;
use auxlight::pins::{Light, Switch};
use auxlight::signals::Signals;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

// ── Clock and delay ───────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClock(Rc<Cell<u64>>);

impl MockClock {
    pub fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    pub fn advance_ms(&self, ms: u64) {
        self.0.set(self.0.get() + ms * 1_000_000);
    }
}

pub struct MockDelay(pub MockClock);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        (self.0).0.set((self.0).0.get() + u64::from(ns));
    }
}

// ── Lamp write record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampWrite {
    pub at_ms: u64,
    pub light: Light,
    pub level: bool,
}

type WriteLog = Rc<RefCell<Vec<LampWrite>>>;

pub struct RecordingPin {
    light: Light,
    clock: MockClock,
    log: WriteLog,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.record(true);
        Ok(())
    }
}

impl RecordingPin {
    fn record(&self, level: bool) {
        self.log.borrow_mut().push(LampWrite {
            at_ms: self.clock.now_ms(),
            light: self.light,
            level,
        });
    }
}

// ── Switch input ──────────────────────────────────────────────

/// Switch level, optionally released automatically at a clock time to
/// model a contact bounce shorter than the debounce window.
#[derive(Clone)]
pub struct MockSwitch {
    level: Rc<Cell<bool>>,
    release_at_ms: Rc<Cell<Option<u64>>>,
    clock: MockClock,
}

impl MockSwitch {
    fn new(clock: MockClock) -> Self {
        Self {
            level: Rc::default(),
            release_at_ms: Rc::default(),
            clock,
        }
    }

    fn read(&self) -> bool {
        match self.release_at_ms.get() {
            Some(t) if self.clock.now_ms() >= t => false,
            _ => self.level.get(),
        }
    }
}

impl ErrorType for MockSwitch {
    type Error = Infallible;
}

impl InputPin for MockSwitch {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.read())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.read())
    }
}

// ── Board ─────────────────────────────────────────────────────

/// Test-side handles onto every mock peripheral.
pub struct Board {
    pub clock: MockClock,
    log: WriteLog,
    switches: [MockSwitch; Switch::COUNT],
}

pub type TestController<'a> =
    Controller<'a, MockSwitch, RecordingPin, MockDelay, MemoryStore>;

#[allow(dead_code)]
impl Board {
    pub fn new() -> Self {
        let clock = MockClock::default();
        Self {
            switches: core::array::from_fn(|_| MockSwitch::new(clock.clone())),
            clock,
            log: Rc::default(),
        }
    }

    pub fn set_switch(&self, switch: Switch, on: bool) {
        let sw = &self.switches[switch as usize];
        sw.release_at_ms.set(None);
        sw.level.set(on);
    }

    /// Close `switch` for `ms` of simulated time, then let it fall back.
    pub fn pulse_switch(&self, switch: Switch, ms: u64) {
        let sw = &self.switches[switch as usize];
        sw.level.set(true);
        sw.release_at_ms.set(Some(self.clock.now_ms() + ms));
    }

    /// Last level written to `light`, or low if never written.
    pub fn lamp(&self, light: Light) -> bool {
        self.log
            .borrow()
            .iter()
            .rev()
            .find(|w| w.light == light)
            .is_some_and(|w| w.level)
    }

    /// Every write to `light` that changed its level, in order.
    pub fn edges(&self, light: Light) -> Vec<LampWrite> {
        let mut last = false;
        self.log
            .borrow()
            .iter()
            .filter(|w| w.light == light)
            .filter(|w| {
                let changed = w.level != last;
                last = w.level;
                changed
            })
            .copied()
            .collect()
    }

    pub fn controller<'a>(
        &self,
        config: ControllerConfig,
        signals: &'a Signals,
        latch: &'a FaultLatch<MemoryStore>,
    ) -> TestController<'a> {
        let sw = |s: Switch| self.switches[s as usize].clone();
        let lamp = |light| RecordingPin {
            light,
            clock: self.clock.clone(),
            log: Rc::clone(&self.log),
        };
        Controller::new(
            config,
            signals,
            latch,
            SwitchPins {
                left: sw(Switch::Left),
                right: sw(Switch::Right),
                hazard: sw(Switch::Hazard),
                head: sw(Switch::Head),
                regen: sw(Switch::Regen),
                mech: sw(Switch::Mech),
            },
            LightPins {
                left: lamp(Light::Left),
                right: lamp(Light::Right),
                brake: lamp(Light::Brake),
                head: lamp(Light::Head),
                strobe: lamp(Light::Strobe),
            },
            MockDelay(self.clock.clone()),
        )
        .expect("test config is valid")
    }
}

/// Run `passes` controller passes, advancing the clock 1 ms per pass on
/// top of any hold or debounce time the pass itself consumed.
pub fn run(c: &mut TestController<'_>, board: &Board, sink: &mut RecordingSink, passes: usize) {
    for _ in 0..passes {
        c.step(sink).unwrap();
        board.clock.advance_ms(1);
    }
}
