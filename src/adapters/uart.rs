//! Serial transports for the display link.
//!
//! - **`target_os = "espidf"`** — [`UartTransport`] wraps an `esp-idf-hal`
//!   UART driver wired to the display header.
//! - **`not(target_os = "espidf")`** — [`StdoutTransport`] prints records to
//!   the console for host-side simulation.

use crate::serial::Transport;

// ── ESP32 UART ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::UartTransport;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::delay::NON_BLOCK;
    use esp_idf_hal::sys::EspError;
    use esp_idf_hal::uart::UartDriver;

    use super::Transport;

    /// A display attached to one ESP32 UART.
    pub struct UartTransport<'d> {
        driver: UartDriver<'d>,
    }

    impl<'d> UartTransport<'d> {
        pub fn new(driver: UartDriver<'d>) -> Self {
            Self { driver }
        }
    }

    impl Transport for UartTransport<'_> {
        type Error = EspError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
            self.driver.read(buf, NON_BLOCK)
        }

        /// Blocks while the TX ring buffer is full, never drops.
        fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
            self.driver.write(data)
        }

        fn available(&self) -> bool {
            self.driver.remaining_read().is_ok_and(|n| n > 0)
        }
    }
}

// ── Host console ──────────────────────────────────────────────

/// Writes records to stdout; never has input.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct StdoutTransport;

#[cfg(not(target_os = "espidf"))]
impl Transport for StdoutTransport {
    type Error = std::io::ErrorKind;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        use std::io::Write;
        std::io::stdout().write(data).map_err(|e| e.kind())
    }

    fn available(&self) -> bool {
        false
    }
}
