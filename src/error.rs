//! Unified error type for the controller core.
//!
//! All variants are `Copy` so they pass through the control loop without
//! allocation.  None of them stops the loop: the caller logs and carries on.

use core::fmt;

use crate::app::ports::ConfigError;
use crate::pins::Light;

/// Every fallible controller operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A light output could not be driven.
    Output(Light),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output(light) => write!(f, "output: {light} write failed"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
