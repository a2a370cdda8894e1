//! Port selection.
//!
//! A status request is answered on the port it arrived on. Requests with no
//! serial origin (queued from a file, raised internally) go to every port.

use log::debug;

use crate::error::SerialError;

use super::sink::Sink;
use super::transport::Transport;

/// Where an inbound request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Received on serial port `n`.
    Serial(u8),
    /// Not received on any serial port.
    Local,
}

/// Ports a record is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortTarget {
    Port(u8),
    All,
}

/// The set of serial transports a display may be attached to.
pub struct SerialPorts<T: Transport, const N: usize> {
    ports: [T; N],
}

impl<T: Transport, const N: usize> SerialPorts<T, N> {
    pub fn new(ports: [T; N]) -> Self {
        Self { ports }
    }

    /// Number of ports.
    pub const fn count(&self) -> usize {
        N
    }

    /// Decide which port(s) answer a request from `origin`.
    pub fn resolve(&self, origin: Origin) -> PortTarget {
        if N <= 1 {
            return PortTarget::Port(0);
        }
        match origin {
            Origin::Serial(index) if (index as usize) < N => PortTarget::Port(index),
            Origin::Serial(index) => {
                debug!("origin port {} out of range, broadcasting", index);
                PortTarget::All
            }
            Origin::Local => PortTarget::All,
        }
    }

    /// Borrow a sink writing to `target`.
    pub fn sink(&mut self, target: PortTarget) -> Result<Sink<'_, T>, SerialError> {
        if let PortTarget::Port(index) = target {
            if index as usize >= N {
                return Err(SerialError::NoSuchPort(index));
            }
        }
        Ok(Sink::new(&mut self.ports, target))
    }

    pub fn port_mut(&mut self, index: usize) -> Option<&mut T> {
        self.ports.get_mut(index)
    }
}
