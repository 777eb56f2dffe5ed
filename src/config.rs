/// Configuration loading.
///
/// Settings live in a TOML file. Every section is optional; a missing file
/// section falls back to the defaults below, so an empty file is a valid
/// configuration.
///
/// ```toml
/// [trace]
/// sibling_order = "sorted"
///
/// [calendar]
/// convention = "standard"
///
/// [network]
/// terminal_codes = ["0", "OCEAN"]
///
/// [logging]
/// level = "info"
/// log_file = "hydrotools.log"
/// console_timestamps = true
/// ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogSettings;
use crate::model::DEFAULT_TERMINAL_CODE;
use crate::trace::TraceOptions;
use crate::water_year::WaterYearConvention;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "HYDROTOOLS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trace: TraceOptions,
    pub calendar: CalendarConfig,
    pub network: NetworkConfig,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub convention: WaterYearConvention,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Downstream values that mark a unit as terminal.
    pub terminal_codes: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            terminal_codes: vec![DEFAULT_TERMINAL_CODE.to_string()],
        }
    }
}

impl NetworkConfig {
    /// Terminal codes as borrowed strings, the form the network builders take.
    pub fn terminal_codes(&self) -> Vec<&str> {
        self.terminal_codes.iter().map(String::as_str).collect()
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads `.env` if present, then the file named by `HYDROTOOLS_CONFIG`.
    /// Returns the defaults when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => Ok(Self::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
