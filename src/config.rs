//! Processing configuration.
//!
//! The configuration file uses [TOML format](https://toml.io/en/). All keys are
//! optional; anything not given falls back to the defaults shown here:
//!
//! ```toml
//! # Resolution of the common time grid in seconds, must be 1 to 60.
//! time_resolution = 30
//!
//! # Day being processed, as YYYY-MM-DD. Raw sample times are seconds
//! # from midnight UTC of this day.
//! date = "2020-01-01"
//! ```
//!
//! `date` has no default; leaving it out means the day must be supplied some
//! other way (e.g. on the command line).
use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::time_axis::{DayEpoch, TimeResolution};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file {0} does not exist")]
    Missing(String),
    #[error("Error loading configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("Error serializing configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Error writing configuration template to {path}: {reason}")]
    WriteTemplate { path: String, reason: String },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub time_resolution: TimeResolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DayEpoch>,
}

impl ProcessingConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config = Self::figment().merge(Toml::string(s)).extract()?;
        Ok(config)
    }

    pub fn from_toml_file(p: &Path) -> Result<Self, ConfigError> {
        // figment silently skips missing files, we want an error instead.
        if !p.exists() {
            return Err(ConfigError::Missing(p.display().to_string()));
        }
        let config = Self::figment().merge(Toml::file(p)).extract()?;
        log::debug!("Loaded configuration from {}: {config:?}", p.display());
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    /// The decimal hour time grid for this configuration's resolution.
    pub fn time_grid(&self) -> Array1<f64> {
        self.time_resolution.grid()
    }

    /// An example configuration, serialized as TOML.
    pub fn template_string() -> Result<String, ConfigError> {
        let example = Self {
            time_resolution: TimeResolution::default(),
            date: DayEpoch::new(2020, 1, 1).ok(),
        };
        let s = toml::to_string_pretty(&example)?;
        Ok(s)
    }

    pub fn write_template(p: &Path) -> Result<(), ConfigError> {
        let s = Self::template_string()?;
        std::fs::write(p, s).map_err(|e| ConfigError::WriteTemplate {
            path: p.display().to_string(),
            reason: e.to_string(),
        })
    }
}
