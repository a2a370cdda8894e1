//! Character-level write primitives for one resolved target.

use core::fmt::Write as _;

use log::warn;

use crate::error::{Error, Result, SerialError};

use super::port::PortTarget;
use super::transport::Transport;

/// Consecutive zero-byte writes tolerated before a port counts as stalled.
pub const MAX_STALLED_WRITES: u32 = 64;

/// Scratch size for one formatted number. Covers `f32::MAX` at two decimals.
const NUMBER_BUF: usize = 48;

/// Write handle for the port(s) answering one request.
///
/// A port that fails is skipped for the rest of the record while the other
/// selected ports keep receiving it. Writes only report an error once every
/// selected port has failed; `end_line` reports the first failure seen.
pub struct Sink<'a, T: Transport> {
    ports: &'a mut [T],
    target: PortTarget,
    /// Bit `i` set once port `i` has failed.
    failed: u32,
    first_error: Option<Error>,
}

impl<'a, T: Transport> Sink<'a, T> {
    pub(crate) fn new(ports: &'a mut [T], target: PortTarget) -> Self {
        Self {
            ports,
            target,
            failed: 0,
            first_error: None,
        }
    }

    /// Emit one ASCII character.
    pub fn write_char(&mut self, c: u8) -> Result<()> {
        self.write_bytes(&[c])
    }

    /// Emit text held in RAM.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Emit text baked into the firmware image.
    pub fn write_const(&mut self, s: &'static str) -> Result<()> {
        self.each_live_port(|port, index| {
            drain(port, index, s.as_bytes(), |t, d| t.write_const(d))
        })
    }

    /// Emit a plain decimal integer.
    pub fn write_int(&mut self, value: i32) -> Result<()> {
        let mut buf: heapless::String<NUMBER_BUF> = heapless::String::new();
        // 11 bytes at most.
        let _ = write!(buf, "{value}");
        self.write_str(&buf)
    }

    /// Emit a float with two decimals. Non-finite values print as `0.00`
    /// so the record stays parseable.
    pub fn write_float(&mut self, value: f32) -> Result<()> {
        let value = if value.is_finite() { value } else { 0.0 };
        let mut buf: heapless::String<NUMBER_BUF> = heapless::String::new();
        // Largest finite f32 is 39 integer digits plus ".00".
        let _ = write!(buf, "{value:.2}");
        self.write_str(&buf)
    }

    /// Terminate the record with each port's own line ending.
    pub fn end_line(&mut self) -> Result<()> {
        self.each_live_port(|port, index| {
            let eol = port.line_terminator();
            drain(port, index, eol, |t, d| t.write_const(d))
        })?;
        match self.first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.each_live_port(|port, index| drain(port, index, data, |t, d| t.write(d)))
    }

    /// Run `emit` on every selected port that has not failed yet.
    fn each_live_port<F>(&mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(&mut T, u8) -> Result<()>,
    {
        for index in self.selected() {
            if self.has_failed(index) {
                continue;
            }
            if let Err(e) = emit(&mut self.ports[index], index as u8) {
                self.failed |= port_bit(index);
                if self.first_error.is_none() {
                    self.first_error = Some(e);
                }
            }
        }
        match self.first_error {
            Some(e) if self.selected().all(|i| self.has_failed(i)) => Err(e),
            _ => Ok(()),
        }
    }

    fn has_failed(&self, index: usize) -> bool {
        self.failed & port_bit(index) != 0
    }

    fn selected(&self) -> core::ops::Range<usize> {
        match self.target {
            PortTarget::Port(index) => index as usize..index as usize + 1,
            PortTarget::All => 0..self.ports.len(),
        }
    }
}

/// Ports past the width of the failure mask are never marked failed.
fn port_bit(index: usize) -> u32 {
    u32::try_from(index)
        .ok()
        .and_then(|i| 1u32.checked_shl(i))
        .unwrap_or(0)
}

/// Push all of `data` through `write`, riding out short writes.
fn drain<'d, T, F>(port: &mut T, index: u8, mut data: &'d [u8], mut write: F) -> Result<()>
where
    T: Transport,
    F: FnMut(&mut T, &'d [u8]) -> core::result::Result<usize, T::Error>,
{
    let mut stalls = 0;
    while !data.is_empty() {
        match write(port, data) {
            Ok(0) => {
                stalls += 1;
                if stalls >= MAX_STALLED_WRITES {
                    warn!("port {}: transmit stalled, abandoning record", index);
                    return Err(SerialError::Stalled { port: index }.into());
                }
            }
            Ok(n) => {
                data = &data[n.min(data.len())..];
                stalls = 0;
            }
            Err(e) => {
                warn!("port {}: write failed: {:?}", index, e);
                return Err(SerialError::WriteFailed { port: index }.into());
            }
        }
    }
    Ok(())
}
