use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use pricer_engine::FetchSettings;
use pricer_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read from `card_pricer.ron` in the working directory unless `--config`
/// names another file.
pub const DEFAULT_CONFIG_FILE: &str = "card_pricer.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    pub fetch: FetchSettings,
    /// Source names to search; empty means every known source.
    pub enabled_sources: Vec<String>,
    pub output_dir: PathBuf,
    pub log: LogDestination,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: String,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            enabled_sources: Vec::new(),
            output_dir: PathBuf::from("reports"),
            log: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

impl PricerConfig {
    /// Unknown level names fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Loads the config file; a missing default file yields the defaults.
///
/// A file named explicitly must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<PricerConfig, ConfigError> {
    let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            return Ok(PricerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
