//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                 |
//! |----------------|---------------------|-----------------------------|
//! | `channel_bus`  | BusPort             | embassy-sync frame channel  |
//! | `file_store`   | ByteStore           | host file (bench EEPROM)    |
//! | `log_sink`     | EventSink           | `log` output                |
//! | `memory_store` | ByteStore           | in-memory EEPROM image      |
//! | `sim`          | InputPin, OutputPin | simulated GPIO and delays   |

pub mod channel_bus;
pub mod file_store;
pub mod log_sink;
pub mod memory_store;
pub mod sim;
