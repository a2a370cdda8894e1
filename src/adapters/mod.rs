//! Adapters — concrete implementations of the port and transport traits.
//!
//! | Adapter           | Implements         | Connects to                 |
//! |-------------------|--------------------|-----------------------------|
//! | `uart`            | Transport          | ESP32 UART / host stdout    |
//! | `delay`           | DelayNs            | FreeRTOS / thread sleep     |
//! | `embedded_config` | ConfigPort         | JSON blob in firmware image |
//! | `machine_sim`     | MachineStatePort   | Simulated printer           |

pub mod delay;
pub mod embedded_config;
pub mod machine_sim;
pub mod uart;
pub(crate) mod utils;
