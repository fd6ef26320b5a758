//! End-to-end scenarios: bus frames and switches in, lamp writes out.

use auxlight::adapters::log_sink::RecordingSink;
use auxlight::adapters::memory_store::MemoryStore;
use auxlight::adapters::sim::SimPin;
use auxlight::app::commands::{
    COMMAND_FAULT_TRIP_ID, COMMAND_HAZARD_SIGNAL_ID, COMMAND_LEFT_SIGNAL_ID,
    COMMAND_MECH_BRAKE_ID, COMMAND_RIGHT_SIGNAL_ID,
};
use auxlight::app::demux::CommandDemux;
use auxlight::app::events::ControllerEvent;
use auxlight::config::ControllerConfig;
use auxlight::drivers::tick::TickSource;
use auxlight::fault_latch::{FaultLatch, LatchState};
use auxlight::fsm::StateId;
use auxlight::pins::{Light, Switch};
use auxlight::signals::Signals;

use crate::mock_hw::{Board, run};

fn clean_latch() -> FaultLatch<MemoryStore> {
    FaultLatch::load(MemoryStore::new(), 0x00)
}

// ── Fault trip ────────────────────────────────────────────────

#[test]
fn fault_trip_frame_latches_and_strobes() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
    c.start(&mut sink).unwrap();

    board.set_switch(Switch::Regen, true);
    board.set_switch(Switch::Head, true);
    signals.set_left(true);
    signals.set_blink_due();
    run(&mut c, &board, &mut sink, 10);
    assert!(board.lamp(Light::Brake));
    assert!(board.lamp(Light::Left));
    assert!(board.lamp(Light::Head));

    let demux = CommandDemux::new(&signals, &latch, true);
    demux.on_frame(COMMAND_FAULT_TRIP_ID, &[]);
    assert_eq!(latch.stored(), Ok(Some(LatchState::Tripped)));

    run(&mut c, &board, &mut sink, 1);
    assert_eq!(c.state(), StateId::Fault);
    for light in [Light::Left, Light::Right, Light::Brake, Light::Head] {
        assert!(!board.lamp(light), "{light} must be off in FAULT");
    }

    // Switches and frames no longer reach the lamps.
    demux.on_frame(COMMAND_RIGHT_SIGNAL_ID, &[]);
    signals.set_blink_due();
    run(&mut c, &board, &mut sink, 60);
    assert_eq!(c.state(), StateId::Fault);
    assert!(!board.lamp(Light::Right) && !board.lamp(Light::Brake));

    let strobe = board.edges(Light::Strobe);
    assert!(strobe.len() >= 60);
    for pair in strobe.windows(2) {
        assert_ne!(pair[0].level, pair[1].level);
        assert!(pair[1].at_ms - pair[0].at_ms >= 50, "half-period respected");
    }

    // Confirmation clear is off by default.
    assert_eq!(latch.stored(), Ok(Some(LatchState::Tripped)));
    assert_eq!(sink.count(&ControllerEvent::FaultEntered), 1);
}

#[test]
fn confirmation_clear_waits_for_two_seconds_of_strobe() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let config = ControllerConfig {
        fault_confirm_clear: true,
        ..ControllerConfig::default()
    };
    let mut c = board.controller(config, &signals, &latch);
    c.start(&mut sink).unwrap();

    CommandDemux::new(&signals, &latch, true).on_frame(COMMAND_FAULT_TRIP_ID, &[]);
    run(&mut c, &board, &mut sink, 1);
    let strobe_start = board.edges(Light::Strobe)[0].at_ms;

    let mut cleared_at = None;
    for _ in 0..100 {
        run(&mut c, &board, &mut sink, 1);
        if cleared_at.is_none() && latch.stored() == Ok(Some(LatchState::Normal)) {
            cleared_at = Some(board.clock.now_ms());
        }
    }

    let cleared_at = cleared_at.expect("latch cleared");
    assert!(cleared_at - strobe_start >= 2000);
    assert_eq!(sink.count(&ControllerEvent::FaultLatchCleared), 1);
    // The session stays in FAULT; the strobe keeps running.
    assert_eq!(c.state(), StateId::Fault);
    let last_edge = board.edges(Light::Strobe).last().map(|w| w.at_ms);
    assert!(last_edge > Some(cleared_at));
}

// ── Turn signals ──────────────────────────────────────────────

#[test]
fn left_then_right_over_bus() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
    c.start(&mut sink).unwrap();
    let demux = CommandDemux::new(&signals, &latch, true);

    demux.on_frame(COMMAND_LEFT_SIGNAL_ID, &[]);
    demux.on_frame(COMMAND_RIGHT_SIGNAL_ID, &[]);
    assert!(!signals.left());
    assert!(signals.right());

    signals.set_blink_due();
    run(&mut c, &board, &mut sink, 4);
    assert!(board.lamp(Light::Right));
    assert!(!board.lamp(Light::Left));
}

#[test]
fn hazard_blinks_both_sides_in_the_same_pass() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let config = ControllerConfig::default();
    let mut tick = TickSource::new(&signals, SimPin::new(false), config.blink_period_ms);
    let mut c = board.controller(config, &signals, &latch);
    c.start(&mut sink).unwrap();

    let demux = CommandDemux::new(&signals, &latch, true);
    demux.on_frame(COMMAND_RIGHT_SIGNAL_ID, &[]);
    demux.on_frame(COMMAND_HAZARD_SIGNAL_ID, &[]);

    for _ in 0..1000 {
        c.step(&mut sink).unwrap();
        board.clock.advance_ms(1);
        tick.on_elapsed(1);
    }

    let left = board.edges(Light::Left);
    let right = board.edges(Light::Right);
    assert!(left.len() >= 4, "hazard blinked {} times", left.len());
    assert_eq!(left.len(), right.len());
    for (l, r) in left.iter().zip(&right) {
        assert_eq!(l.at_ms, r.at_ms);
        assert_eq!(l.level, r.level);
    }
    for pair in left.windows(2) {
        let gap = pair[1].at_ms - pair[0].at_ms;
        assert!((195..=205).contains(&gap), "blink gap {gap} ms");
    }
}

#[test]
fn hazard_off_returns_to_individual_flags() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
    c.start(&mut sink).unwrap();
    let demux = CommandDemux::new(&signals, &latch, true);

    demux.on_frame(COMMAND_LEFT_SIGNAL_ID, &[]);
    demux.on_frame(COMMAND_HAZARD_SIGNAL_ID, &[]);
    demux.on_frame(COMMAND_HAZARD_SIGNAL_ID, &[]);
    for _ in 0..3 {
        signals.set_blink_due();
        run(&mut c, &board, &mut sink, 4);
    }
    assert!(board.edges(Light::Right).is_empty());
    assert!(!board.edges(Light::Left).is_empty());
}

// ── Brake ─────────────────────────────────────────────────────

#[test]
fn brake_follows_either_source() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
    c.start(&mut sink).unwrap();

    board.set_switch(Switch::Regen, true);
    run(&mut c, &board, &mut sink, 4);
    assert!(board.lamp(Light::Brake));

    board.set_switch(Switch::Regen, false);
    run(&mut c, &board, &mut sink, 4);
    assert!(!board.lamp(Light::Brake));

    CommandDemux::new(&signals, &latch, true).on_frame(COMMAND_MECH_BRAKE_ID, &[]);
    run(&mut c, &board, &mut sink, 2);
    assert!(board.lamp(Light::Brake));
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn short_glitch_is_ignored_and_held_switch_accepted() {
    let board = Board::new();
    let signals = Signals::new(false);
    let latch = clean_latch();
    let mut sink = RecordingSink::new();
    let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
    c.start(&mut sink).unwrap();

    board.pulse_switch(Switch::Left, 5);
    run(&mut c, &board, &mut sink, 6);
    assert!(!signals.left());
    assert!(sink.events.iter().all(|e| !matches!(e, ControllerEvent::SwitchChanged { .. })));

    board.set_switch(Switch::Left, true);
    run(&mut c, &board, &mut sink, 2);
    assert!(signals.left());
    assert_eq!(
        sink.count(&ControllerEvent::SwitchChanged {
            switch: Switch::Left,
            level: true
        }),
        1
    );

    board.set_switch(Switch::Right, true);
    run(&mut c, &board, &mut sink, 2);
    assert!(signals.right());
    assert!(!signals.left(), "right switch clears left");
}
