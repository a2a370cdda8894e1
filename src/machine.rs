//! Machine state as seen by the status report.
//!
//! The temperature controller, planner and print tracker own the real
//! values; they hand over a [`MachineSnapshot`] per request and the report
//! only reads it. Counts (hotends, extruders, fans) always come from
//! [`MachineConfig`]. When a snapshot is shorter than the configuration
//! says, or the feature is absent, the accessors fall back to fixed values
//! instead of failing.

use heapless::Vec;

use crate::config::{MAX_EXTRUDERS, MAX_FANS, MAX_HOTENDS, MachineConfig};

/// Flow percentage assumed for an extruder with no reading.
pub const DEFAULT_FLOW_PERCENT: i16 = 100;

/// Current and target temperature of one heating element (°C).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaterReading {
    pub current: f32,
    pub target: f32,
}

impl HeaterReading {
    pub const fn new(current: f32, target: f32) -> Self {
        Self { current, target }
    }

    /// Status digit: 2 while a setpoint is active, 0 when off.
    pub fn status_digit(&self) -> u8 {
        if self.target != 0.0 { 2 } else { 0 }
    }
}

/// Homed state of the three linear axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisFlags {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisFlags {
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    /// X, Y, Z as 0/1 digits.
    pub fn digits(&self) -> [u8; 3] {
        [u8::from(self.x), u8::from(self.y), u8::from(self.z)]
    }
}

/// A point-in-time view of everything the status report shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineSnapshot {
    /// A job is running from removable media.
    pub sd_printing: bool,
    /// Bed heater, if one is reporting.
    pub bed: Option<HeaterReading>,
    /// Hotends in physical index order.
    pub hotends: Vec<HeaterReading, MAX_HOTENDS>,
    /// X, Y, Z in machine units.
    pub position: [f32; 3],
    /// The single logical extrusion axis.
    pub e_position: f32,
    /// Global feed-rate override (%).
    pub feedrate_percent: i16,
    /// Per-extruder flow override (%).
    pub flow_percent: Vec<i16, MAX_EXTRUDERS>,
    /// Selected extruder.
    pub active_extruder: u8,
    /// Per-fan duty, 0..=255.
    pub fan_speed: Vec<u8, MAX_FANS>,
    pub homed: AxisFlags,
    /// Job completion in whole percent, when known.
    pub progress_percent: Option<u8>,
}

impl MachineSnapshot {
    /// Bed reading, or zeros when no heated bed is configured.
    pub fn bed(&self, config: &MachineConfig) -> HeaterReading {
        if config.heated_bed {
            self.bed.unwrap_or_default()
        } else {
            HeaterReading::default()
        }
    }

    /// Hotend `index`, or zeros when the snapshot has no such entry.
    pub fn hotend(&self, index: usize) -> HeaterReading {
        self.hotends.get(index).copied().unwrap_or_default()
    }

    /// Bed first, then each configured hotend.
    pub fn heaters<'a>(
        &'a self,
        config: &'a MachineConfig,
    ) -> impl Iterator<Item = HeaterReading> + 'a {
        core::iter::once(self.bed(config))
            .chain((0..config.hotends as usize).map(|e| self.hotend(e)))
    }

    /// Flow override for extruder `index`, 100% when unknown.
    pub fn flow_percent(&self, index: usize) -> i16 {
        self.flow_percent
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_FLOW_PERCENT)
    }

    /// Duty of fan `index`, 0 when unknown.
    pub fn fan_duty(&self, index: usize) -> u8 {
        self.fan_speed.get(index).copied().unwrap_or(0)
    }

    /// Progress as a fraction in [0, 1]. 0 when unknown.
    pub fn fraction_printed(&self) -> f32 {
        0.01 * f32::from(self.progress_percent.unwrap_or(0).min(100))
    }
}

/// Rescale a 0..=255 fan duty to whole percent, rounding down.
pub fn fan_percent(duty: u8) -> u8 {
    (u16::from(duty) * 100 / 255) as u8
}

/// Synthesised fan RPM: duty × 10. There is no tachometer behind this.
pub fn fan_rpm(duty: u8) -> i32 {
    i32::from(duty) * 10
}
