//! # Gateway Configuration
//!
//! Process-wide settings, resolved once at startup and never re-read.
//!
//! ## Resolution order (later wins)
//!
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment variables:
//!    - `QARNOT_BASE_URL` (default: `https://api.qarnot.com`)
//!    - `QARNOT_API_VERSION` (default: `1`)
//!    - `LOG_LEVEL` (default: `info`)
//!    - `QARNOT_MCP_HOST` (default: `0.0.0.0`)
//!    - `QARNOT_MCP_PORT` (default: `8000`)
//!    - `QARNOT_TIMEOUT_SECS` (default: `30`)
//! 4. Explicit overrides (CLI flags)

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.qarnot.com";
pub const DEFAULT_API_VERSION: &str = "1";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// =============================================================================
// CONFIG
// =============================================================================

/// Immutable gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Vendor API root, without trailing slash.
    pub base_url: String,
    /// Vendor API version, rendered as `/v{api_version}`.
    pub api_version: String,
    /// Default log verbosity when `RUST_LOG` is not set.
    pub log_level: String,
    pub host: String,
    pub port: u16,
    /// Timeout applied to each outbound call.
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Partial settings from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub log_level: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Read overrides from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Read overrides through a variable lookup (normally `std::env::var`).
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = get("QARNOT_MCP_PORT")
            .map(|v| {
                v.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                    key: "QARNOT_MCP_PORT",
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let timeout_secs = get("QARNOT_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    key: "QARNOT_TIMEOUT_SECS",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            base_url: get("QARNOT_BASE_URL"),
            api_version: get("QARNOT_API_VERSION"),
            log_level: get("LOG_LEVEL"),
            host: get("QARNOT_MCP_HOST"),
            port,
            timeout_secs,
        })
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }
}

impl GatewayConfig {
    /// Apply one layer of overrides on top of this configuration.
    #[must_use]
    pub fn merge(mut self, layer: ConfigOverrides) -> Self {
        if let Some(v) = layer.base_url {
            self.base_url = v;
        }
        if let Some(v) = layer.api_version {
            self.api_version = v;
        }
        if let Some(v) = layer.log_level {
            self.log_level = v;
        }
        if let Some(v) = layer.host {
            self.host = v;
        }
        if let Some(v) = layer.port {
            self.port = v;
        }
        if let Some(v) = layer.timeout_secs {
            self.request_timeout = Duration::from_secs(v);
        }
        self
    }

    /// Check and normalize the merged configuration.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        let has_scheme = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_scheme {
            return Err(ConfigError::InvalidValue {
                key: "base_url",
                reason: format!("'{}' is not an absolute http(s) URL", self.base_url),
            });
        }
        self.base_url = base_url;

        let trimmed_version = self.api_version.trim();
        let api_version = trimmed_version
            .strip_prefix('v')
            .unwrap_or(trimmed_version)
            .to_string();
        if api_version.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "api_version",
                reason: "must not be empty".to_string(),
            });
        }
        self.api_version = api_version;

        let log_level = self.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log_level",
                reason: format!("'{}' is not one of {}", self.log_level, LOG_LEVELS.join("|")),
            });
        }
        self.log_level = log_level;

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(self)
    }

    /// Versioned API root, e.g. `https://api.qarnot.com/v1`.
    pub fn api_root(&self) -> String {
        format!("{}/v{}", self.base_url, self.api_version)
    }

    /// Socket address string for the inbound listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        let config = GatewayConfig::default().validate().expect("valid");
        assert_eq!(config.api_root(), "https://api.qarnot.com/v1");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn env_overrides_apply() {
        let vars = env(&[
            ("QARNOT_BASE_URL", "http://localhost:9000/"),
            ("QARNOT_API_VERSION", "2"),
            ("LOG_LEVEL", "DEBUG"),
            ("QARNOT_MCP_PORT", "9001"),
        ]);
        let layer = ConfigOverrides::from_env_with(|k| vars.get(k).cloned()).expect("parse");
        let config = GatewayConfig::default().merge(layer).validate().expect("valid");

        assert_eq!(config.api_root(), "http://localhost:9000/v2");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.port, 9001);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let vars = env(&[("QARNOT_BASE_URL", "")]);
        let layer = ConfigOverrides::from_env_with(|k| vars.get(k).cloned()).expect("parse");
        assert_eq!(layer.base_url, None);
    }

    #[test]
    fn bad_port_is_rejected() {
        let vars = env(&[("QARNOT_MCP_PORT", "eighty")]);
        let err = ConfigOverrides::from_env_with(|k| vars.get(k).cloned()).expect_err("invalid port");
        assert!(matches!(err, ConfigError::InvalidValue { key: "QARNOT_MCP_PORT", .. }));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let config = GatewayConfig {
            base_url: "api.qarnot.com".into(),
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let config = GatewayConfig {
            log_level: "loud".into(),
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = GatewayConfig {
            request_timeout: Duration::ZERO,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn version_prefix_is_normalized() {
        let config = GatewayConfig {
            api_version: "v1".into(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.validate().expect("valid").api_root(), "https://api.qarnot.com/v1");
    }

    #[test]
    fn only_one_version_prefix_is_stripped() {
        let config = GatewayConfig {
            api_version: "vv1".into(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.validate().expect("valid").api_root(), "https://api.qarnot.com/vv1");
    }
}
