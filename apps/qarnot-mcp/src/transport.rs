//! # HTTP Transport
//!
//! Serves the MCP endpoint over streamable HTTP with axum.
//!
//! ## Endpoints
//!
//! - `POST|GET|DELETE /mcp` - MCP streamable-HTTP transport
//! - `GET /health` - Health check
//!
//! ## Configuration (Environment Variables)
//!
//! - `QARNOT_MCP_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

use crate::client::QarnotClient;
use crate::error::AppError;
use crate::gateway::TaskGateway;
use crate::server::QarnotMcp;
use axum::{
    Json, Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use qarnot_core::GatewayConfig;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Path the MCP service is mounted on.
pub const MCP_PATH: &str = "/mcp";

// =============================================================================
// HEALTH
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Headers an MCP client sends, including both credential carriers.
fn allowed_headers() -> [HeaderName; 6] {
    [
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::AUTHORIZATION,
        HeaderName::from_static("x-api-key"),
        HeaderName::from_static("mcp-session-id"),
        HeaderName::from_static("mcp-protocol-version"),
    ]
}

fn base_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(allowed_headers())
        .expose_headers([HeaderName::from_static("mcp-session-id")])
}

/// Build CORS layer from an origins setting.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (QARNOT_MCP_CORS_ORIGINS=*)");
            base_cors().allow_origin(tower_http::cors::Any)
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in QARNOT_MCP_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                base_cors().allow_origin(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No QARNOT_MCP_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8000",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    base_cors().allow_origin(origins)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with the MCP service and health endpoint.
///
/// Every MCP session gets its own `QarnotMcp`, all sharing one gateway and
/// therefore one pooled HTTP client.
pub fn create_router(gateway: TaskGateway, cors_origins: Option<&str>) -> Router {
    let mcp_service = StreamableHttpService::new(
        move || Ok(QarnotMcp::new(gateway.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(health_handler))
        .nest_service(MCP_PATH, mcp_service)
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl-C.
pub async fn run_server(config: GatewayConfig) -> Result<(), AppError> {
    let client = QarnotClient::new(&config)?;
    tracing::info!("Forwarding tool calls to {}", client.api_root());

    let cors_origins = std::env::var("QARNOT_MCP_CORS_ORIGINS").ok();
    let router = create_router(TaskGateway::new(client), cors_origins.as_deref());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!("Qarnot MCP server listening on http://{}{}", addr, MCP_PATH);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Qarnot MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
