//! PanelDue bridge firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  UartTransport     CooperativeDelay   EmbeddedConfig         │
//! │  (Transport)       (DelayNs)          (ConfigPort)           │
//! │  SimulatedMachine                                            │
//! │  (MachineStatePort)                                          │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │         PanelService (pure logic)                    │    │
//! │  │  HostCommand · StatusLatch · status report encoder   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use paneldue::adapters::delay::CooperativeDelay;
use paneldue::adapters::embedded_config::EmbeddedConfig;
use paneldue::adapters::machine_sim::SimulatedMachine;
use paneldue::adapters::uart::UartTransport;
use paneldue::app::commands::{HostCommand, LineBuffer};
use paneldue::app::service::PanelService;
use paneldue::serial::{Origin, SerialPorts, Transport};
use paneldue::status;

/// PanelDue factory baud rate.
const PANEL_BAUD: u32 = 57_600;

/// Longest command line accepted from the display.
const LINE_CAP: usize = 96;

static MACHINE_DEFINITION: &[u8] = include_bytes!("../config/machine.json");

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("PanelDue bridge v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Machine definition ─────────────────────────────────
    let config = EmbeddedConfig::new(MACHINE_DEFINITION).load_or_default();
    let mut service = PanelService::new(config.clone());
    service.start();

    // ── 3. Display UART (UART0 stays on the console) ──────────
    let peripherals = Peripherals::take()?;
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(PANEL_BAUD)),
    )?;
    let mut ports = SerialPorts::new([UartTransport::new(uart)]);
    config
        .check_port_count(ports.count())
        .map_err(|e| anyhow::anyhow!("machine definition: {e}"))?;

    let mut machine = SimulatedMachine::new(&config);
    machine.home_all();
    machine.set_bed_target(60.0);
    machine.set_hotend_target(0, 200.0);
    machine.set_fan(0, 128);
    status::set_status_const("Ready");

    let mut delay = CooperativeDelay::new();
    let mut line: LineBuffer<LINE_CAP> = LineBuffer::new();
    let mut rx = [0u8; 32];

    info!("Waiting for display traffic on UART1 @ {} baud", PANEL_BAUD);

    // ── 4. Command loop ───────────────────────────────────────
    loop {
        let n = match ports.port_mut(0).map(|p| p.read(&mut rx)) {
            Some(Ok(n)) => n,
            Some(Err(e)) => {
                warn!("UART read failed: {:?}", e);
                0
            }
            None => 0,
        };

        for &b in &rx[..n] {
            if !line.push(b) {
                continue;
            }
            if let Some(cmd) = line.line().and_then(|l| HostCommand::parse(l, Origin::Serial(0))) {
                // A failed record is already logged and counted.
                let _ = service.handle_command(cmd, &mut machine, &mut ports, &mut delay);
            }
            line.clear();
        }

        if n == 0 {
            esp_idf_hal::delay::FreeRtos::delay_ms(10);
        }
    }
}
