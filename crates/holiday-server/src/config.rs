//! Configuration management for the holiday proxy.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use holiday_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("config.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::handlers::batch::{BatchMode, DEFAULT_MAX_BATCH_DATES};

/// Environment variable prefix: `HOLIDAYS_SERVER__PORT` -> `server.port`.
pub const ENV_PREFIX: &str = "HOLIDAYS";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Upstream provider settings
    #[serde(default)]
    pub upstream: UpstreamSettings,

    /// Single-date lookup settings
    #[serde(default)]
    pub lookup: LookupSettings,

    /// Batch aggregation settings
    #[serde(default)]
    pub batch: BatchSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Metrics settings
    #[serde(default)]
    pub metrics: MetricsSettings,

    /// Startup smoke test settings
    #[serde(default)]
    pub smoke_test: SmokeTestSettings,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// `host:port` the batch endpoints use to call this service.
    ///
    /// When unset, the address the listener actually bound is used, with an
    /// unspecified host (`0.0.0.0`, `::`) replaced by loopback.
    #[serde(default)]
    pub self_address: Option<String>,

    /// Maximum request body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            self_address: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    1024 * 1024
}

/// Upstream provider settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UpstreamSettings {
    /// Scheme and authority of the holiday provider
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_upstream_base_url() -> String {
    "https://date.nager.at".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

/// Single-date lookup settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LookupSettings {
    /// Return 502 from `/isHoliday` when the calendar cannot be fetched,
    /// instead of answering "no holidays".
    #[serde(default)]
    pub propagate_upstream_errors: bool,
}

/// Batch aggregation settings.
///
/// # Example YAML Configuration
///
/// ```yaml
/// batch:
///   mode: self_call
///   max_dates: 100
///   timeout_secs: 15
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BatchSettings {
    /// How each date is checked: "self_call" (HTTP to this service's own
    /// `/isHoliday` endpoint) or "in_process"
    #[serde(default = "default_batch_mode")]
    pub mode: String,

    /// Maximum number of dates accepted in one batch
    #[serde(default = "default_max_dates")]
    pub max_dates: usize,

    /// Timeout in seconds for each self-call. In `self_call` mode it must
    /// exceed `upstream.timeout_secs`, since every self-call waits on one
    /// upstream fetch.
    #[serde(default = "default_batch_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            mode: default_batch_mode(),
            max_dates: default_max_dates(),
            timeout_secs: default_batch_timeout_secs(),
        }
    }
}

impl BatchSettings {
    /// Parsed `mode`. Call after `ServerConfig::validate`.
    pub fn batch_mode(&self) -> Result<BatchMode, ConfigLoadError> {
        BatchMode::from_str(&self.mode).map_err(|message| ConfigLoadError::Invalid { message })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_batch_mode() -> String {
    BatchMode::SelfCall.as_str().to_string()
}

fn default_max_dates() -> usize {
    DEFAULT_MAX_BATCH_DATES
}

fn default_batch_timeout_secs() -> u64 {
    15
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MetricsSettings {
    /// Install the Prometheus recorder and serve `/metrics`
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// One-shot request sent to the JSON batch endpoint right after startup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SmokeTestSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_smoke_country")]
    pub country_code: String,

    #[serde(default = "default_smoke_dates")]
    pub dates: Vec<String>,
}

impl Default for SmokeTestSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            country_code: default_smoke_country(),
            dates: default_smoke_dates(),
        }
    }
}

fn default_smoke_country() -> String {
    "US".to_string()
}

fn default_smoke_dates() -> Vec<String> {
    vec!["2021-07-05".to_string()]
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `HOLIDAYS_` and use `__` as separator.
    /// For example:
    /// - `HOLIDAYS_SERVER__PORT=9090` overrides `server.port`
    /// - `HOLIDAYS_BATCH__MODE=in_process` overrides `batch.mode`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if let Some(addr) = &self.server.self_address {
            if addr.trim().is_empty() {
                return Err(ConfigLoadError::Invalid {
                    message: "server.self_address must not be empty when set".to_string(),
                });
            }
        }

        let base_url = self.upstream.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "upstream.base_url must be an http(s) URL, got: {:?}",
                    self.upstream.base_url
                ),
            });
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "upstream.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.batch.timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "batch.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.batch.batch_mode()? == BatchMode::SelfCall
            && self.batch.timeout_secs <= self.upstream.timeout_secs
        {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "batch.timeout_secs ({}) must be greater than upstream.timeout_secs ({}) \
                     in self_call mode",
                    self.batch.timeout_secs, self.upstream.timeout_secs
                ),
            });
        }

        if self.batch.max_dates == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "batch.max_dates must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// `host:port` string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_source() -> Environment {
    // Use __ as separator for nested keys: HOLIDAYS_SERVER__PORT -> server.port
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
