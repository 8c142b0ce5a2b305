//! # qarnot-mcp
//!
//! MCP gateway to the Qarnot compute API.
//!
//! ```text
//! AI client <--MCP (streamable HTTP)--> qarnot-mcp <--HTTPS--> Qarnot REST API
//! ```
//!
//! Each tool call is translated into exactly one vendor call, authenticated
//! with the credential the caller sent on that request. Nothing is cached.

pub mod cli;
pub mod client;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod params;
pub mod server;
pub mod transport;

pub use client::{ClientError, QarnotClient};
pub use error::{AppError, GatewayError};
pub use gateway::{Confirmation, TaskGateway, with_cancellation};
pub use server::QarnotMcp;
pub use transport::{HealthResponse, MCP_PATH, create_router, run_server};
