//! Application core: lighting domain logic behind port traits.
//!
//! Bus commands, the frame demultiplexer, outbound events and the
//! controller service.  Hardware is reached only through the
//! [`ports`] traits and the `embedded-hal` pin and delay traits.

pub mod commands;
pub mod demux;
pub mod events;
pub mod ports;
pub mod service;
