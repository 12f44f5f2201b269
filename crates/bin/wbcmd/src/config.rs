//! Configuration loading.
//!
//! Two sources:
//! - the **stand configuration**, a JSON array of device records at
//!   `MQTT_ENV_CONFIG` (default `/etc/wbcmd/mqtt_env_config`);
//! - optional **tool settings**, a TOML file at `WBCMD_SETTINGS` (default
//!   `/etc/wbcmd/wbcmd.toml`). Every field has a sensible default so the
//!   file is optional. Environment variables take precedence over file
//!   values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wbcmd_adapter_mqtt::MqttConfig;
use wbcmd_domain::device::{Device, DeviceTable};
use wbcmd_domain::error::ValidationError;

pub const STAND_CONFIG_ENV: &str = "MQTT_ENV_CONFIG";
pub const DEFAULT_STAND_CONFIG: &str = "/etc/wbcmd/mqtt_env_config";
pub const SETTINGS_ENV: &str = "WBCMD_SETTINGS";
pub const DEFAULT_SETTINGS: &str = "/etc/wbcmd/wbcmd.toml";
/// Covers every `wbcmd*` crate, since targets match by prefix.
pub const DEFAULT_LOG_FILTER: &str = "wbcmd=info";

/// Top-level tool settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Broker client settings.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the settings file (if present) then apply
    /// environment-variable overrides read through `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read or is
    /// malformed, or if the result fails validation.
    pub fn load(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = env(SETTINGS_ENV).unwrap_or_else(|| DEFAULT_SETTINGS.to_string());
        let mut settings = Self::from_file(Path::new(&path))?;
        settings.apply_env_overrides(&env);
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Settings {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(val) = env("WBCMD_MQTT_CLIENT_ID") {
            self.mqtt.client_id = val;
        }
        if let Some(val) = env("WBCMD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = env("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.client_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mqtt.client_id must not be empty".to_string(),
            ));
        }
        if self.mqtt.connect_timeout_secs == 0 || self.mqtt.publish_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "mqtt timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the stand configuration lives.
pub fn stand_config_path(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    env(STAND_CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_STAND_CONFIG), PathBuf::from)
}

/// Read, parse and validate the stand configuration at `path`.
///
/// # Errors
///
/// Returns an error if the file can't be read, isn't a JSON array of device
/// records, or any record has an empty field.
pub fn load_device_table(path: &Path) -> Result<DeviceTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_device_table(&content).map_err(|err| match err {
        ParseError::Json(source) => ConfigError::Stand {
            path: path.to_path_buf(),
            source,
        },
        ParseError::Device(err) => ConfigError::Device(err),
    })
}

fn parse_device_table(content: &str) -> Result<DeviceTable, ParseError> {
    let devices: Vec<Device> = serde_json::from_str(content)?;
    Ok(DeviceTable::new(devices)?)
}

#[derive(Debug, thiserror::Error)]
enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Device(#[from] ValidationError),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Settings TOML parse failure.
    #[error("failed to parse settings file {}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Stand configuration JSON parse failure.
    #[error("failed to parse stand configuration {}", path.display())]
    Stand {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// File I/O failure.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A device record broke a domain invariant.
    #[error("invalid stand configuration")]
    Device(#[source] ValidationError),
    /// Semantic validation failure.
    #[error("invalid settings: {0}")]
    Validation(String),
}
