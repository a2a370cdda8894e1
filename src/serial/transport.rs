//! Transport abstraction — any byte-oriented serial channel.
//!
//! Concrete implementations:
//! - UART (PanelDue header on the controller board)
//! - stdout (host simulation)
//!
//! The report encoder is generic over `Transport`, so adding a new
//! transport requires zero changes to the encoding logic.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written. A full transmit
    /// buffer may block briefly; it must not silently drop bytes.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Write a string that lives in the firmware image.
    ///
    /// Split-memory targets override this with their program-memory read
    /// routine. Unified address spaces keep the default.
    fn write_const(&mut self, data: &'static [u8]) -> Result<usize, Self::Error> {
        self.write(data)
    }

    /// Check if data is available for reading.
    fn available(&self) -> bool;

    /// Record terminator for this link.
    fn line_terminator(&self) -> &'static [u8] {
        b"\n"
    }
}

/// A null transport that discards all writes and never reads.
/// Useful for a port slot with nothing attached.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn available(&self) -> bool {
        false
    }
}
