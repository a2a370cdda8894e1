//! Application service — answers display traffic.
//!
//! [`PanelService`] owns the machine definition and report counters. All I/O
//! flows through parameters injected at call sites, making the service
//! testable with mock adapters.
//!
//! ```text
//!  MachineStatePort ──▶ ┌────────────────────┐ ──▶ SerialPorts
//!                       │    PanelService     │
//!  HostCommand ───────▶ │  resolve · encode   │ ◀── StatusLatch
//!                       └────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::MachineConfig;
use crate::error::Result;
use crate::report::{ReportRequest, write_status_report};
use crate::serial::{SerialPorts, Transport};
use crate::status::{self, StatusLatch};

use super::commands::HostCommand;
use super::ports::MachineStatePort;

// ───────────────────────────────────────────────────────────────
// PanelService
// ───────────────────────────────────────────────────────────────

pub struct PanelService {
    config: MachineConfig,
    reports_sent: u32,
    reports_failed: u32,
}

impl PanelService {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            config,
            reports_sent: 0,
            reports_failed: 0,
        }
    }

    pub fn start(&self) {
        info!(
            "PanelService started: '{}' {} hotend(s), {} extruder(s), {} fan(s), geometry={}",
            self.config.machine_name,
            self.config.hotends,
            self.config.extruders,
            self.config.fan_count,
            self.config.geometry().as_str()
        );
    }

    // ── Command handling ──────────────────────────────────────

    /// Act on one host command. Latch updates go to the process-wide
    /// status message.
    pub fn handle_command<T, D, const P: usize>(
        &mut self,
        cmd: HostCommand<'_>,
        machine: &mut impl MachineStatePort,
        ports: &mut SerialPorts<T, P>,
        delay: &mut D,
    ) -> Result<()>
    where
        T: Transport,
        D: DelayNs,
    {
        match cmd {
            HostCommand::ReportStatus(request) => self.report(request, machine, ports, delay),
            HostCommand::SetMessage(text) => {
                status::set_status(text);
                Ok(())
            }
            HostCommand::ClearMessage => {
                status::clear_status();
                Ok(())
            }
        }
    }

    /// Send one status record carrying the process-wide status message.
    pub fn report<T, D, const P: usize>(
        &mut self,
        request: ReportRequest,
        machine: &mut impl MachineStatePort,
        ports: &mut SerialPorts<T, P>,
        delay: &mut D,
    ) -> Result<()>
    where
        T: Transport,
        D: DelayNs,
    {
        let latch = status::status_snapshot();
        self.report_with_latch(request, &latch, machine, ports, delay)
    }

    /// Send one status record carrying `latch`.
    pub fn report_with_latch<T, D, const P: usize, const N: usize>(
        &mut self,
        request: ReportRequest,
        latch: &StatusLatch<N>,
        machine: &mut impl MachineStatePort,
        ports: &mut SerialPorts<T, P>,
        delay: &mut D,
    ) -> Result<()>
    where
        T: Transport,
        D: DelayNs,
    {
        let target = ports.resolve(request.origin);
        let mut sink = ports
            .sink(target)
            .inspect_err(|_| self.reports_failed = self.reports_failed.wrapping_add(1))?;
        let snapshot = machine.snapshot();

        match write_status_report(&mut sink, delay, &self.config, &snapshot, latch, request.style) {
            Ok(()) => {
                self.reports_sent = self.reports_sent.wrapping_add(1);
                debug!("status report sent to {:?} ({:?})", target, request.style);
                Ok(())
            }
            Err(e) => {
                self.reports_failed = self.reports_failed.wrapping_add(1);
                warn!("status report to {:?} abandoned: {}", target, e);
                Err(e)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Records written completely.
    pub fn reports_sent(&self) -> u32 {
        self.reports_sent
    }

    /// Records abandoned on a transport failure.
    pub fn reports_failed(&self) -> u32 {
        self.reports_failed
    }
}
