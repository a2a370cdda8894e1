//! Port traits — the boundary between the reporting core and the rest of
//! the firmware.
//!
//! ```text
//!   Planner / heaters / job tracker ──▶ MachineStatePort ──▶ PanelService
//!   Flash / NVS blob                ──▶ ConfigPort       ──▶ PanelService
//! ```

use crate::config::MachineConfig;
use crate::machine::MachineSnapshot;

// ───────────────────────────────────────────────────────────────
// Machine state port (driven adapter: machine → report)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the service calls this once per status request.
pub trait MachineStatePort {
    /// Current values of everything the report shows.
    fn snapshot(&mut self) -> MachineSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads the machine definition.
///
/// Implementations MUST run [`MachineConfig::validate`] before handing a
/// definition back.
pub trait ConfigPort {
    fn load(&self) -> Result<MachineConfig, ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No machine definition present.
    NotFound,
    /// Stored definition failed to parse.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::NotFound => Self::Config("not found"),
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
