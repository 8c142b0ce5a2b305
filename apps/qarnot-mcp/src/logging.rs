//! Tracing setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to the
//! gateway crates, rmcp and tower-http. `QARNOT_MCP_LOG_FORMAT=json` enables
//! machine-parseable output.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives used when `RUST_LOG` is absent.
pub fn default_directives(level: &str) -> String {
    format!("qarnot_mcp={level},qarnot_core={level},rmcp={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_tracing(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into());
    let log_format = std::env::var("QARNOT_MCP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
