//! # Qarnot MCP CLI
//!
//! Command-line flags, applied as the last configuration layer.

use clap::Parser;
use qarnot_core::{ConfigError, ConfigOverrides, GatewayConfig};
use std::path::PathBuf;

/// Qarnot MCP Server
///
/// Exposes the Qarnot compute API as MCP tools over streamable HTTP.
/// Callers authenticate each request with their own Qarnot API key.
#[derive(Parser, Debug)]
#[command(name = "qarnot-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Qarnot API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Qarnot API version
    #[arg(long)]
    pub api_version: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Outbound request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Flags as a configuration layer.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            api_version: self.api_version.clone(),
            log_level: self.log_level.clone(),
            host: self.host.clone(),
            port: self.port,
            timeout_secs: self.timeout_secs,
        }
    }

    /// Resolve defaults, config file, environment and flags, in that order.
    pub fn resolve_config_with(&self, env: ConfigOverrides) -> Result<GatewayConfig, ConfigError> {
        let mut config = GatewayConfig::default();
        if let Some(ref path) = self.config {
            config = config.merge(ConfigOverrides::from_toml_file(path)?);
        }
        config.merge(env).merge(self.overrides()).validate()
    }

    /// Resolve the configuration against the process environment.
    pub fn resolve_config(&self) -> Result<GatewayConfig, ConfigError> {
        self.resolve_config_with(ConfigOverrides::from_env()?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
