//! Machine definition baked into the firmware image.
//!
//! Implements [`ConfigPort`] over a JSON blob linked in at build time
//! (`config/machine.json`). A missing or rejected blob leaves the firmware
//! on [`MachineConfig::default`].

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MachineConfig;

pub struct EmbeddedConfig {
    blob: &'static [u8],
}

impl EmbeddedConfig {
    pub const fn new(blob: &'static [u8]) -> Self {
        Self { blob }
    }

    /// Load the definition, falling back to defaults on any error.
    pub fn load_or_default(&self) -> MachineConfig {
        match self.load() {
            Ok(config) => {
                info!("Machine definition loaded ({} bytes)", self.blob.len());
                config
            }
            Err(ConfigError::NotFound) => {
                info!("No machine definition embedded, using defaults");
                MachineConfig::default()
            }
            Err(e) => {
                warn!("Machine definition rejected ({}), using defaults", e);
                MachineConfig::default()
            }
        }
    }
}

impl ConfigPort for EmbeddedConfig {
    fn load(&self) -> Result<MachineConfig, ConfigError> {
        if self.blob.iter().all(u8::is_ascii_whitespace) {
            return Err(ConfigError::NotFound);
        }
        MachineConfig::from_json(self.blob)
    }
}
