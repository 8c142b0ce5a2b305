//! # qarnot-core
//!
//! Request-scoped domain layer for the Qarnot MCP gateway.
//!
//! Everything here is synchronous and free of network code:
//! - `credential` - locating and masking the caller's API key
//! - `types` - task/profile references, log streams, submission descriptors
//! - `config` - immutable gateway configuration with layered resolution
//! - `error` - failures detected before any outbound call

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod credential;
pub mod error;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use config::{ConfigOverrides, GatewayConfig};
pub use credential::{API_KEY_HEADER, AUTHORIZATION_HEADER, Credential, extract_credential};
pub use error::{ArgumentError, ConfigError, CredentialError};
pub use types::{Constant, LogStream, ProfileName, TaskSubmission, TaskSummary, TaskUuid};
