//! Application core — request handling, zero direct I/O.
//!
//! Turns host commands into status records and latch updates. Machine state
//! arrives through the [`ports::MachineStatePort`] trait and bytes leave
//! through [`crate::serial`], so this layer runs unchanged against mocks.

pub mod commands;
pub mod ports;
pub mod service;
