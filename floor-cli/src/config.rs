//! Application configuration read from a TOML file.
//!
//! Every key has a default, so a missing file, a missing section or a
//! missing key all fall back to the values in the `Default` impls below.

use std::path::{Path, PathBuf};

use floor_core::{ServiceOptions, StoreError};
use floor_store::RecordFormat;
use serde::Deserialize;
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "flooring.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub format: FormatConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub orders_dir: PathBuf,
    pub products_file: PathBuf,
    pub states_file: PathBuf,
    pub export_file: PathBuf,
    pub audit_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            orders_dir: PathBuf::from("Orders"),
            products_file: PathBuf::from("Data/Products.txt"),
            states_file: PathBuf::from("Data/Taxes.txt"),
            export_file: PathBuf::from("Backup/DataExport.txt"),
            audit_file: PathBuf::from("audit.txt"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub delimiter: char,
    pub substitute: char,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            substitute: '/',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Each `flooring` run is a whole session, so changes go to disk as they
    /// happen.
    pub write_through: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            write_through: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Also append log lines to this file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else [`DEFAULT_CONFIG_FILE`] when it exists
    /// in `dir`, else the defaults.
    pub fn discover(
        explicit: Option<&Path>,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::load(&fallback);
        }
        Ok(Self::default())
    }

    /// Apply command line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        orders_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(dir) = orders_dir {
            self.paths.orders_dir = dir;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        self
    }

    pub fn record_format(&self) -> Result<RecordFormat, StoreError> {
        RecordFormat::new(self.format.delimiter, self.format.substitute)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            export_destination: self.paths.export_file.clone(),
            write_through: self.store.write_through,
        }
    }
}
