//! Serial output for status records.
//!
//! ```text
//! ┌──────────────┐  resolve(origin)  ┌─────────────┐   bytes   ┌───────────┐
//! │ ReportRequest│──────────────────▶│ SerialPorts │──────────▶│ Transport │ × N
//! └──────────────┘                   │   → Sink    │           └───────────┘
//!                                    └─────────────┘
//! ```
//!
//! A [`Sink`](sink::Sink) is resolved once per request and every byte of the
//! record goes through it, so a record is never split across ports.

pub mod port;
pub mod sink;
pub mod transport;

pub use port::{Origin, PortTarget, SerialPorts};
pub use sink::Sink;
pub use transport::{NullTransport, Transport};
