//! Light output driver.
//!
//! Level-sets the five lamp outputs from the commanded levels each pass.
//! Writes are idempotent; no acknowledgement comes back from the lamps.

use embedded_hal::digital::OutputPin;
use log::error;

use crate::error::{Error, Result};
use crate::fsm::context::LightCommands;
use crate::pins::Light;

/// Pins for [`LightOutputs`], one per lamp channel.
pub struct LightPins<P> {
    pub left: P,
    pub right: P,
    pub brake: P,
    pub head: P,
    pub strobe: P,
}

pub struct LightOutputs<P> {
    pins: LightPins<P>,
}

impl<P: OutputPin> LightOutputs<P> {
    pub fn new(pins: LightPins<P>) -> Self {
        Self { pins }
    }

    /// Drive every output to its commanded level.  All outputs are
    /// attempted; the first failure is returned.
    pub fn apply(&mut self, commands: &LightCommands) -> Result<()> {
        let mut first_err = None;
        for light in Light::ALL {
            if let Err(e) = self.set(light, commands.level(light)) {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn set(&mut self, light: Light, on: bool) -> Result<()> {
        let pin = match light {
            Light::Left => &mut self.pins.left,
            Light::Right => &mut self.pins.right,
            Light::Brake => &mut self.pins.brake,
            Light::Head => &mut self.pins.head,
            Light::Strobe => &mut self.pins.strobe,
        };
        let result = if on { pin.set_high() } else { pin.set_low() };
        result.map_err(|e| {
            error!("lights: {} write failed: {:?}", light, e);
            Error::Output(light)
        })
    }
}
