//! Power-cycle behaviour: the Fault Latch decides the boot state.

use auxlight::adapters::log_sink::RecordingSink;
use auxlight::adapters::memory_store::MemoryStore;
use auxlight::app::commands::COMMAND_FAULT_TRIP_ID;
use auxlight::app::demux::CommandDemux;
use auxlight::app::events::ControllerEvent;
use auxlight::config::ControllerConfig;
use auxlight::fault_latch::{FaultLatch, LatchState};
use auxlight::fsm::StateId;
use auxlight::pins::{Light, Switch};
use auxlight::signals::Signals;

use crate::mock_hw::{Board, run};

/// Boot a fresh controller over `store` and run `passes` passes.
/// Returns the store (the "EEPROM" that survives the power cycle),
/// the boot state and the board for inspection.
fn power_cycle(
    store: MemoryStore,
    config: ControllerConfig,
    passes: usize,
) -> (MemoryStore, StateId, Board) {
    let board = Board::new();
    let latch = FaultLatch::load(store, config.fault_latch_addr);
    let signals = Signals::new(latch.boot_state().is_tripped());
    let mut sink = RecordingSink::new();
    let boot_state = {
        let mut c = board.controller(config, &signals, &latch);
        c.start(&mut sink).unwrap();
        let boot_state = c.state();
        board.set_switch(Switch::Regen, true);
        board.set_switch(Switch::Left, true);
        run(&mut c, &board, &mut sink, passes);
        boot_state
    };
    (latch.into_store(), boot_state, board)
}

#[test]
fn trip_survives_power_cycle() {
    let board = Board::new();
    let latch = FaultLatch::load(MemoryStore::new(), 0x00);
    let signals = Signals::new(false);
    let mut sink = RecordingSink::new();
    {
        let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
        c.start(&mut sink).unwrap();
        CommandDemux::new(&signals, &latch, true).on_frame(COMMAND_FAULT_TRIP_ID, &[]);
        run(&mut c, &board, &mut sink, 2);
        assert_eq!(c.state(), StateId::Fault);
    }
    let store = latch.into_store();
    assert_eq!(store.peek(0x00), 0x01);

    let (store, boot_state, board) = power_cycle(store, ControllerConfig::default(), 20);
    assert_eq!(boot_state, StateId::Fault);
    assert!(!board.lamp(Light::Brake), "switches ignored after boot into FAULT");
    assert!(!board.lamp(Light::Left));
    assert!(board.edges(Light::Strobe).len() >= 20);
    assert_eq!(store.peek(0x00), 0x01, "no clear without confirmation mode");
}

#[test]
fn erased_cell_boots_normal() {
    let (_, boot_state, board) = power_cycle(MemoryStore::new(), ControllerConfig::default(), 6);
    assert_eq!(boot_state, StateId::Idle);
    assert!(board.lamp(Light::Brake));
    assert!(board.edges(Light::Strobe).is_empty());
}

#[test]
fn corrupt_latch_byte_boots_into_fault() {
    let store = MemoryStore::new().with_byte(0x00, 0x5A);
    let (_, boot_state, _) = power_cycle(store, ControllerConfig::default(), 2);
    assert_eq!(boot_state, StateId::Fault);
}

#[test]
fn unreadable_store_boots_into_fault() {
    let mut store = MemoryStore::new();
    store.set_failing(true);
    let (_, boot_state, _) = power_cycle(store, ControllerConfig::default(), 2);
    assert_eq!(boot_state, StateId::Fault);
}

#[test]
fn latch_address_is_configurable() {
    let config = ControllerConfig {
        fault_latch_addr: 0x10,
        ..ControllerConfig::default()
    };
    let store = MemoryStore::new().with_byte(0x00, 0x01);
    let (_, boot_state, _) = power_cycle(store, config.clone(), 2);
    assert_eq!(boot_state, StateId::Idle);

    let store = MemoryStore::new().with_byte(0x10, 0x01);
    let (_, boot_state, _) = power_cycle(store, config, 2);
    assert_eq!(boot_state, StateId::Fault);
}

#[test]
fn confirmed_clear_lets_next_boot_run_normally() {
    let config = ControllerConfig {
        fault_confirm_clear: true,
        ..ControllerConfig::default()
    };
    let store = MemoryStore::new().with_byte(0x00, LatchState::Tripped.as_byte());

    let (store, boot_state, _) = power_cycle(store, config.clone(), 60);
    assert_eq!(boot_state, StateId::Fault);
    assert_eq!(store.peek(0x00), LatchState::Normal.as_byte());

    let (_, boot_state, board) = power_cycle(store, config, 6);
    assert_eq!(boot_state, StateId::Idle);
    assert!(board.lamp(Light::Brake));
}

#[test]
fn boot_into_fault_reports_once() {
    let board = Board::new();
    let latch = FaultLatch::load(MemoryStore::new().with_byte(0, 0x01), 0);
    let signals = Signals::new(latch.boot_state().is_tripped());
    let mut sink = RecordingSink::new();
    let mut c = board.controller(ControllerConfig::default(), &signals, &latch);
    c.start(&mut sink).unwrap();
    run(&mut c, &board, &mut sink, 5);
    assert_eq!(
        sink.events[..2],
        [ControllerEvent::Started(StateId::Fault), ControllerEvent::FaultEntered]
    );
    assert_eq!(sink.count(&ControllerEvent::FaultEntered), 1);
}
