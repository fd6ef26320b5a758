//! Fuzz target: `CommandDemux::on_frame`
//!
//! Interprets the input as a stream of frames (2-byte identifier offset,
//! 1-byte payload length, payload) and drives them through the
//! demultiplexer.  Asserts that the turn flags are never both set, that
//! unknown identifiers never touch the latch, and that a trip is always
//! persisted.
//!
//! cargo fuzz run fuzz_frame_demux

#![no_main]

use auxlight::adapters::memory_store::MemoryStore;
use auxlight::app::commands::{BusCommand, MAX_PAYLOAD};
use auxlight::app::demux::CommandDemux;
use auxlight::fault_latch::{FaultLatch, LatchState};
use auxlight::signals::Signals;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&flags, mut rest)) = data.split_first() else {
        return;
    };

    let signals = Signals::default();
    let latch = FaultLatch::load(MemoryStore::new(), 0);
    let demux = CommandDemux::new(&signals, &latch, flags & 1 == 1);

    while let [hi, lo, len, tail @ ..] = rest {
        // Bias identifiers towards the command table.
        let id = 0x2F0 + u32::from(u16::from_be_bytes([*hi, *lo]) % 0x20);
        let len = (*len as usize % (MAX_PAYLOAD + 1)).min(tail.len());
        let (payload, next) = tail.split_at(len);
        rest = next;

        let was_tripped = signals.fault_latched();
        match demux.on_frame(id, payload) {
            Some(BusCommand::FaultTrip) => {
                assert!(signals.fault_latched());
                assert_eq!(latch.stored(), Ok(Some(LatchState::Tripped)));
            }
            Some(_) => {}
            None => assert_eq!(signals.fault_latched(), was_tripped),
        }
        assert!(!(signals.left() && signals.right()), "left and right both set");
    }

    if !signals.fault_latched() {
        assert_eq!(latch.into_store().write_count(), 0);
    }
});
