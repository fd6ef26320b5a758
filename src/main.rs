//! auxlight bench: the full controller on the host.
//!
//! Runs the control loop against simulated pins, with the Tick Source and
//! the bus receive path on their own threads, and plays a short scripted
//! drive: indicators, hazards, brake, then a fault trip.
//!
//! ```text
//! ┌──────────────┐ Frame ┌──────────────┐
//! │ script thread│──────▶│ BUS_CHANNEL  │──▶ bus thread: CommandDemux::poll
//! │ (switches,   │       └──────────────┘          │
//! │  frames)     │                                 ▼
//! └──────┬───────┘   SimPin levels          ┌────────────┐
//!        └─────────────────────────────────▶│  Signals   │◀── tick thread
//!                                           └─────┬──────┘
//!                                                 ▼
//!                                     main thread: Controller::step
//! ```
//!
//! Environment:
//! - `AUXLIGHT_CONFIG`: path to a JSON `ControllerConfig` (optional)
//! - `AUXLIGHT_LATCH`: Fault Latch image file (default `auxlight-latch.bin`)
//! - `RUST_LOG`: `env_logger` filter (default `info`)
#![deny(unused_must_use)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use auxlight::adapters::channel_bus::{BUS_CHANNEL, ChannelBus};
use auxlight::adapters::file_store::FileStore;
use auxlight::adapters::log_sink::LogEventSink;
use auxlight::adapters::sim::{SimPin, StdDelay};
use auxlight::app::commands::{BusCommand, Frame};
use auxlight::app::demux::CommandDemux;
use auxlight::app::service::Controller;
use auxlight::config::ControllerConfig;
use auxlight::drivers::lights::LightPins;
use auxlight::drivers::switches::SwitchPins;
use auxlight::drivers::tick::TickSource;
use auxlight::fault_latch::FaultLatch;
use auxlight::fsm::StateId;
use auxlight::pins::HEARTBEAT_NET;
use auxlight::signals::Signals;

const DEFAULT_LATCH_PATH: &str = "auxlight-latch.bin";

/// Bench pass pacing when no state asks for a hold.
const LOOP_IDLE: Duration = Duration::from_millis(1);

// ── Bench harness ─────────────────────────────────────────────

/// The far side of every simulated pin.
struct Harness {
    switches: SwitchPins<SimPin>,
    lights: LightPins<SimPin>,
    heartbeat: SimPin,
}

impl Harness {
    fn new() -> Self {
        let p = || SimPin::new(false);
        Self {
            switches: SwitchPins {
                left: p(),
                right: p(),
                hazard: p(),
                head: p(),
                regen: p(),
                mech: p(),
            },
            lights: LightPins {
                left: p(),
                right: p(),
                brake: p(),
                head: p(),
                strobe: p(),
            },
            heartbeat: p(),
        }
    }

    fn switch_pins(&self) -> SwitchPins<SimPin> {
        let s = &self.switches;
        SwitchPins {
            left: s.left.clone(),
            right: s.right.clone(),
            hazard: s.hazard.clone(),
            head: s.head.clone(),
            regen: s.regen.clone(),
            mech: s.mech.clone(),
        }
    }

    fn light_pins(&self) -> LightPins<SimPin> {
        let l = &self.lights;
        LightPins {
            left: l.left.clone(),
            right: l.right.clone(),
            brake: l.brake.clone(),
            head: l.head.clone(),
            strobe: l.strobe.clone(),
        }
    }

    fn report(&self) {
        let l = &self.lights;
        info!(
            "LAMPS | left={} right={} brake={} head={} strobe={} | {} edges={}",
            l.left.level(),
            l.right.level(),
            l.brake.level(),
            l.head.level(),
            l.strobe.level(),
            HEARTBEAT_NET,
            self.heartbeat.edges(),
        );
    }
}

// ── Configuration ─────────────────────────────────────────────

fn load_config() -> Result<ControllerConfig> {
    let config = match std::env::var_os("AUXLIGHT_CONFIG") {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.to_string_lossy()))?;
            let config: ControllerConfig =
                serde_json::from_str(&text).context("parsing controller config")?;
            info!("Config loaded from {}", path.to_string_lossy());
            config
        }
        None => {
            info!("No AUXLIGHT_CONFIG, using defaults");
            ControllerConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}

// ── Scripted drive ────────────────────────────────────────────

fn send(cmd: BusCommand) {
    info!("SCRIPT | bus {:?} ({:#05x})", cmd, cmd.id());
    ChannelBus::new(&BUS_CHANNEL).deliver(Frame::new(cmd.id()));
}

fn pause(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

fn run_script(harness: &Harness) {
    let sw = &harness.switches;

    info!("SCRIPT | headlight on, left indicator");
    sw.head.set_level(true);
    sw.left.set_level(true);
    pause(1000);
    harness.report();

    info!("SCRIPT | left off, right via bus");
    sw.left.set_level(false);
    pause(100);
    send(BusCommand::RightToggle);
    pause(1000);
    harness.report();

    send(BusCommand::HazardToggle);
    pause(1000);
    harness.report();
    send(BusCommand::HazardToggle);

    info!("SCRIPT | regen brake");
    sw.regen.set_level(true);
    pause(500);
    harness.report();
    sw.regen.set_level(false);
    send(BusCommand::MechBrakeToggle);
    pause(500);
    harness.report();
    send(BusCommand::MechBrakeToggle);

    send(BusCommand::FaultTrip);
    pause(3000);
    harness.report();
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("auxlight bench v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let latch_path =
        std::env::var("AUXLIGHT_LATCH").unwrap_or_else(|_| DEFAULT_LATCH_PATH.to_owned());
    let latch = FaultLatch::load(FileStore::open(&latch_path), config.fault_latch_addr);
    let signals = Signals::new(latch.boot_state().is_tripped());
    info!("Fault Latch {} -> {:?}", latch_path, latch.boot_state());

    let harness = Harness::new();
    let stop = AtomicBool::new(false);
    let mut controller = Controller::new(
        config.clone(),
        &signals,
        &latch,
        harness.switch_pins(),
        harness.light_pins(),
        StdDelay,
    )?;

    thread::scope(|s| -> Result<()> {
        // Tick Source: 1 ms timer interrupt stand-in.
        s.spawn(|| {
            let mut tick =
                TickSource::new(&signals, harness.heartbeat.clone(), config.blink_period_ms);
            while !stop.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
                tick.on_elapsed(1);
            }
        });

        // Bus receive path.
        s.spawn(|| {
            let demux = CommandDemux::new(&signals, &latch, config.mech_brake_command);
            let mut bus = ChannelBus::new(&BUS_CHANNEL);
            while !stop.load(Ordering::Acquire) {
                demux.poll(&mut bus);
                thread::sleep(Duration::from_millis(1));
            }
        });

        // Driver and bus traffic.
        s.spawn(|| {
            if signals.fault_latched() {
                info!("SCRIPT | booted into FAULT, watching the strobe");
                pause(2000);
                harness.report();
            } else {
                run_script(&harness);
            }
            stop.store(true, Ordering::Release);
        });

        let mut sink = LogEventSink::new();
        if let Err(e) = controller.start(&mut sink) {
            warn!("initial output write failed: {}", e);
        }

        while !stop.load(Ordering::Acquire) {
            match controller.step(&mut sink) {
                Ok(StateId::Fault) => {}
                Ok(_) => thread::sleep(LOOP_IDLE),
                Err(e) => warn!("pass completed with output error: {}", e),
            }
        }

        info!("Bench finished in {:?}", controller.state());
        Ok(())
    })?;

    harness.report();
    Ok(())
}
