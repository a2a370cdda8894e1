//! Cooperative delay used between array fields of a status record.
//!
//! - **`target_os = "espidf"`** — yields to FreeRTOS so the UART driver
//!   task can drain its buffer.
//! - **`not(target_os = "espidf")`** — `std::thread::sleep`.

use embedded_hal::delay::DelayNs;

#[derive(Debug, Default, Clone, Copy)]
pub struct CooperativeDelay;

impl CooperativeDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for CooperativeDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos::delay_us(ns.div_ceil(1000));
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for CooperativeDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(u64::from(ns)));
    }
}
