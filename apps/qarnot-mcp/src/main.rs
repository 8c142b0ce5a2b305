//! # Qarnot MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) gateway to Qarnot.
//!
//! Configuration is resolved once at startup (see `qarnot_core::config`):
//! - `QARNOT_BASE_URL` - Qarnot API URL (default: `https://api.qarnot.com`)
//! - `QARNOT_API_VERSION` - API version (default: `1`)
//! - `LOG_LEVEL` - log verbosity (default: `info`)
//!
//! No API key is configured here: every caller sends its own, via
//! `Authorization: Bearer <key>` or `X-Api-Key`.

use clap::Parser;
use qarnot_mcp::{cli::Cli, logging, run_server};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    logging::init_tracing(&config.log_level);
    tracing::info!(
        "Qarnot MCP server starting, target: {}, api version: {}",
        config.base_url,
        config.api_version
    );

    if let Err(e) = run_server(config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
