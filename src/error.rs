//! Unified error types for the PanelDue reporting firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! command loop's error handling uniform. All variants are `Copy` so they
//! can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A serial transport failed while a record was being written.
    Serial(SerialError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(e) => write!(f, "serial: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Serial errors
// ---------------------------------------------------------------------------

/// Transport-level failures. The record in flight is abandoned; the display
/// resynchronises on the next complete `{...}` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// The underlying write primitive returned an error.
    WriteFailed { port: u8 },
    /// The transport kept accepting zero bytes.
    Stalled { port: u8 },
    /// No transport is registered under this index.
    NoSuchPort(u8),
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed { port } => write!(f, "write failed on port {port}"),
            Self::Stalled { port } => write!(f, "port {port} stalled"),
            Self::NoSuchPort(port) => write!(f, "no such port {port}"),
        }
    }
}

impl From<SerialError> for Error {
    fn from(e: SerialError) -> Self {
        Self::Serial(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
