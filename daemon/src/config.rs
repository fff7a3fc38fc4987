//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use worktrust_types::VerificationParams;
use worktrust_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the verification service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding the LMDB evidence store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Base URL of the ip-api.com–compatible geolocation service.
    #[serde(default = "default_geoip_url")]
    pub geoip_url: String,

    /// Hard bound on one geolocation lookup.
    #[serde(default = "default_geoip_timeout_ms")]
    pub geoip_timeout_ms: u64,

    /// Hard bound on one history read.
    #[serde(default = "default_history_timeout_ms")]
    pub history_timeout_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Verification thresholds and deductions.
    #[serde(default)]
    pub params: VerificationParams,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./worktrust_data")
}

fn default_map_size_mb() -> usize {
    256
}

fn default_geoip_url() -> String {
    worktrust_geoip::client::DEFAULT_ENDPOINT.to_string()
}

fn default_geoip_timeout_ms() -> u64 {
    5_000
}

fn default_history_timeout_ms() -> u64 {
    2_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            geoip_url: default_geoip_url(),
            geoip_timeout_ms: default_geoip_timeout_ms(),
            history_timeout_ms: default_history_timeout_ms(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: VerificationParams::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size_mb == 0 {
            return Err(ConfigError::Invalid("map_size_mb must be positive".into()));
        }
        if self.geoip_timeout_ms == 0 || self.history_timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".into()));
        }
        let p = &self.params;
        if p.ip_warn_distance_km > p.ip_fail_distance_km
            || p.velocity_warn_kmh > p.velocity_fail_kmh
            || p.network_warn_distance_km > p.network_fail_distance_km
        {
            return Err(ConfigError::Invalid(
                "warning thresholds must not exceed failure thresholds".into(),
            ));
        }
        if p.min_altitude_m > p.max_altitude_m {
            return Err(ConfigError::Invalid(
                "min_altitude_m must not exceed max_altitude_m".into(),
            ));
        }
        if p.pass_threshold > 100 {
            return Err(ConfigError::Invalid("pass_threshold must be within 0..=100".into()));
        }
        Ok(())
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn geoip_timeout(&self) -> Duration {
        Duration::from_millis(self.geoip_timeout_ms)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_millis(self.history_timeout_ms)
    }
}
