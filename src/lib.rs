//! Auxiliary lighting controller library.
//!
//! Turn signals, hazard flashers, brake lamp, headlight and a fault
//! strobe for a small vehicle, driven by debounced harness switches and
//! identifier-keyed bus commands.  Everything here runs on the host; the
//! board reaches it through `embedded-hal` pins and delays and the
//! [`app::ports`] traits.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fault_latch;
pub mod fsm;
pub mod pins;
pub mod signals;
