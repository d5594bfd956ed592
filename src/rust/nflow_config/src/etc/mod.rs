//! Manages the `/etc/nflowd.conf` file.

mod decoder;
mod listener;
mod top_config;

pub use decoder::DecoderConfig;
pub use listener::ListenerConfig;
pub use top_config::Config;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Where the configuration lives unless `NFLOWD_CONFIG` says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nflowd.conf";

/// Environment variable that overrides the configuration path.
const CONFIG_ENV: &str = "NFLOWD_CONFIG";

/// The path to the configuration file, taken from `NFLOWD_CONFIG` if
/// set and from `/etc/nflowd.conf` otherwise.
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Loads the configuration from the standard location.
///
/// A missing file at the default path is not an error: the collector
/// runs with defaults. A path named explicitly through `NFLOWD_CONFIG`
/// must exist.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        info!("{DEFAULT_CONFIG_PATH} not found, using default settings");
        let config = Config::default();
        config.validate().map_err(ConfigError::Invalid)?;
        return Ok(config);
    }
    load_config_from(&path)
}

/// Loads and validates a configuration file from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigDoesNotExist(path.display().to_string()));
    }
    debug!("Loading configuration from {:?}", path);
    let raw = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::CannotReadFile(path.display().to_string()))?;
    Config::load_from_string(&raw)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file {0} not found")]
    ConfigDoesNotExist(String),
    #[error("Unable to read contents of {0}")]
    CannotReadFile(String),
    #[error("Unable to parse TOML: {0}")]
    CannotParseToml(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
