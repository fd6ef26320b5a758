//! Channel-backed bus adapter.
//!
//! Uses an `embassy-sync` bounded channel as the receive buffer between
//! the transceiver side (an interrupt handler on hardware, a bench thread
//! on the host) and the demultiplexer.  No heap allocation.
//!
//! ```text
//! ┌──────────────┐   Frame   ┌──────────────┐
//! │ Transceiver  │──────────▶│ CommandDemux │
//! │ (ISR/thread) │           │  (poll loop) │
//! └──────────────┘           └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::Frame;
use crate::app::ports::BusPort;

/// Receive buffer depth, in frames.
pub const BUS_DEPTH: usize = 16;

pub type FrameChannel = Channel<CriticalSectionRawMutex, Frame, BUS_DEPTH>;

/// Process-wide receive buffer used by the bench.
pub static BUS_CHANNEL: FrameChannel = Channel::new();

/// Both ends of one frame channel.
#[derive(Clone, Copy)]
pub struct ChannelBus<'a> {
    channel: &'a FrameChannel,
}

impl<'a> ChannelBus<'a> {
    pub fn new(channel: &'a FrameChannel) -> Self {
        Self { channel }
    }

    /// Queue a frame as if it had arrived on the wire.  A full buffer
    /// drops the frame, like a transceiver overrun.
    pub fn deliver(&self, frame: Frame) -> bool {
        match self.channel.try_send(frame) {
            Ok(()) => true,
            Err(_) => {
                warn!("bus: receive buffer full, frame dropped");
                false
            }
        }
    }
}

impl BusPort for ChannelBus<'_> {
    fn try_receive(&mut self) -> Option<Frame> {
        self.channel.try_receive().ok()
    }
}
