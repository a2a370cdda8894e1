//! Machine configuration
//!
//! The hardware facts the status report depends on: which heaters, fans and
//! storage exist, how many extruders are fitted, and the motion geometry.
//! On a stock build these are fixed at flash time; here they are a plain
//! struct so one binary can be exercised against many machine variants.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::adapters::utils::is_printable_ascii;
use crate::app::ports::ConfigError;

/// Upper bound on hotends (heaters other than the bed).
pub const MAX_HOTENDS: usize = 8;
/// Upper bound on extruder drives.
pub const MAX_EXTRUDERS: usize = 8;
/// Upper bound on part-cooling fans.
pub const MAX_FANS: usize = 8;
/// Upper bound on independent serial ports.
pub const MAX_SERIAL_PORTS: usize = 2;
/// Maximum machine-name length in bytes.
pub const MACHINE_NAME_LEN: usize = 32;

/// Motion geometry reported in the extended block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kinematics {
    Scara,
    Hangprinter,
    Delta,
    CoreXY,
    CoreXZ,
    CoreYZ,
    CoreYX,
    CoreZX,
    CoreZY,
    Cartesian,
}

impl Kinematics {
    /// Tag understood by the display.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scara => "scara",
            Self::Hangprinter => "hangprinter",
            Self::Delta => "delta",
            Self::CoreXY => "corexy",
            Self::CoreXZ => "corexz",
            Self::CoreYZ => "coreyz",
            Self::CoreYX => "coreyx",
            Self::CoreZX => "corezx",
            Self::CoreZY => "corezy",
            Self::Cartesian => "cartesian",
        }
    }
}

/// Geometry switches as they appear in a machine definition.
///
/// Exactly one should be set. When several are, the first in declaration
/// order wins; with none set the machine is cartesian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsFlags {
    pub scara: bool,
    pub hangprinter: bool,
    pub delta: bool,
    pub corexy: bool,
    pub corexz: bool,
    pub coreyz: bool,
    pub coreyx: bool,
    pub corezx: bool,
    pub corezy: bool,
}

impl KinematicsFlags {
    fn ordered(&self) -> [(bool, Kinematics); 9] {
        [
            (self.scara, Kinematics::Scara),
            (self.hangprinter, Kinematics::Hangprinter),
            (self.delta, Kinematics::Delta),
            (self.corexy, Kinematics::CoreXY),
            (self.corexz, Kinematics::CoreXZ),
            (self.coreyz, Kinematics::CoreYZ),
            (self.coreyx, Kinematics::CoreYX),
            (self.corezx, Kinematics::CoreZX),
            (self.corezy, Kinematics::CoreZY),
        ]
    }

    /// Resolve the geometry, first match wins.
    pub fn geometry(&self) -> Kinematics {
        self.ordered()
            .into_iter()
            .find_map(|(set, k)| set.then_some(k))
            .unwrap_or(Kinematics::Cartesian)
    }

    /// Number of geometry switches turned on.
    pub fn enabled_count(&self) -> usize {
        self.ordered().iter().filter(|(set, _)| *set).count()
    }
}

/// Static description of the machine being reported on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name shown by the display (`myName`).
    pub machine_name: heapless::String<MACHINE_NAME_LEN>,
    /// Heating elements besides the bed.
    pub hotends: u8,
    /// Extruder drives (may exceed `hotends` on switching/mixing machines).
    pub extruders: u8,
    /// Part-cooling fans; 0 drops the fan fields from the report.
    pub fan_count: u8,
    /// A heated bed is wired in.
    pub heated_bed: bool,
    /// A removable-media slot is wired in.
    pub sd_support: bool,
    /// Print progress is tracked and reported.
    pub print_progress: bool,
    /// Independent serial ports a display may be attached to.
    pub serial_ports: u8,
    pub kinematics: KinematicsFlags,
}

impl Default for MachineConfig {
    fn default() -> Self {
        let mut machine_name = heapless::String::new();
        // Fits: 10 bytes into 32.
        let _ = machine_name.push_str("3D Printer");
        Self {
            machine_name,
            hotends: 1,
            extruders: 1,
            fan_count: 1,
            heated_bed: true,
            sd_support: true,
            print_progress: true,
            serial_ports: 1,
            kinematics: KinematicsFlags::default(),
        }
    }
}

impl MachineConfig {
    /// Parse a JSON machine definition and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field. Conflicting geometry switches are accepted
    /// (first match wins) but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hotends == 0 || self.hotends as usize > MAX_HOTENDS {
            return Err(ConfigError::ValidationFailed("hotends must be 1..=8"));
        }
        if self.extruders == 0 || self.extruders as usize > MAX_EXTRUDERS {
            return Err(ConfigError::ValidationFailed("extruders must be 1..=8"));
        }
        if self.fan_count as usize > MAX_FANS {
            return Err(ConfigError::ValidationFailed("fan_count must be <= 8"));
        }
        if self.serial_ports == 0 || self.serial_ports as usize > MAX_SERIAL_PORTS {
            return Err(ConfigError::ValidationFailed("serial_ports must be 1..=2"));
        }
        let name = self.machine_name.as_str();
        if !is_printable_ascii(name) || name.contains(['"', '\\']) {
            return Err(ConfigError::ValidationFailed(
                "machine_name must be printable ASCII without quotes",
            ));
        }
        if self.kinematics.enabled_count() > 1 {
            warn!(
                "{} geometry switches enabled, reporting {}",
                self.kinematics.enabled_count(),
                self.kinematics.geometry().as_str()
            );
        }
        Ok(())
    }

    /// Confirm the firmware wired up as many display ports as the
    /// definition declares.
    pub fn check_port_count(&self, available: usize) -> Result<(), ConfigError> {
        if usize::from(self.serial_ports) == available {
            Ok(())
        } else {
            warn!(
                "definition declares {} serial port(s), firmware provides {}",
                self.serial_ports, available
            );
            Err(ConfigError::ValidationFailed(
                "serial_ports does not match the wired display ports",
            ))
        }
    }

    /// Geometry tag for the extended block.
    pub fn geometry(&self) -> Kinematics {
        self.kinematics.geometry()
    }

    /// Removable-media slots (`volumes`).
    pub fn volumes(&self) -> u8 {
        u8::from(self.sd_support)
    }
}
