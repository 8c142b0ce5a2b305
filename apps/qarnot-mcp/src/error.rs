//! # Gateway Errors
//!
//! Every way a tool invocation can fail, each with a stable machine-readable
//! kind. Messages never contain credential values or raw transport errors.

use crate::client::ClientError;
use qarnot_core::{ArgumentError, ConfigError, CredentialError};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors surfaced to the MCP client as tool errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No credential on the inbound request.
    #[error(transparent)]
    MissingCredential(#[from] CredentialError),

    /// The credential cannot be forwarded as an HTTP header.
    #[error("Malformed credential: not representable as an HTTP header value")]
    MalformedCredential,

    /// A tool argument failed validation.
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),

    /// The vendor has no such task.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// The vendor has no such task, or no such instance of it.
    #[error("Task or instance not found: {0}")]
    TaskOrInstanceNotFound(String),

    /// The vendor has no such profile.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// The vendor refused to abort the task.
    #[error("Cannot abort task (may already be completed): {0}")]
    AbortRejected(String),

    /// The vendor rejected the credential (401).
    #[error("Qarnot rejected the API key: {0}")]
    Unauthorized(String),

    /// Any other 4xx/5xx from the vendor.
    #[error("Failed to {action}: Qarnot API error ({status}): {message}")]
    Vendor {
        action: &'static str,
        status: u16,
        message: String,
    },

    /// The vendor answered 2xx with a body of the wrong shape.
    #[error("Failed to {action}: unexpected response from Qarnot: {detail}")]
    InvalidResponse {
        action: &'static str,
        detail: String,
    },

    /// The vendor could not be reached at all.
    #[error("Could not reach remote service: {0}")]
    Unreachable(String),

    /// The invocation was cancelled before the vendor answered.
    #[error("Request cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Stable identifier for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "authentication_missing",
            Self::MalformedCredential => "authentication_malformed",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::TaskNotFound(_) => "task_not_found",
            Self::TaskOrInstanceNotFound(_) => "task_or_instance_not_found",
            Self::ProfileNotFound(_) => "profile_not_found",
            Self::AbortRejected(_) => "abort_rejected",
            Self::Unauthorized(_) => "unauthorized",
            Self::Vendor { .. } => "vendor_error",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::Unreachable(_) => "unreachable",
            Self::Cancelled => "cancelled",
        }
    }

    /// HTTP status reported by the vendor, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TaskNotFound(_)
            | Self::TaskOrInstanceNotFound(_)
            | Self::ProfileNotFound(_) => Some(404),
            Self::AbortRejected(_) => Some(403),
            Self::Unauthorized(_) => Some(401),
            Self::Vendor { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured body for an MCP tool error result.
    pub fn to_structured(&self) -> Value {
        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        if let (Some(status), Some(map)) = (self.status(), body.as_object_mut()) {
            map.insert("status".to_string(), json!(status));
        }
        body
    }

    /// Translate a client failure for an operation with no resource-specific
    /// status handling.
    pub fn from_client(action: &'static str, err: ClientError) -> Self {
        match err {
            ClientError::ConnectionFailed(root) => Self::Unreachable(root),
            ClientError::Status {
                status: 401,
                message,
            } => Self::Unauthorized(message),
            ClientError::Status { status, message } => Self::Vendor {
                action,
                status,
                message,
            },
            ClientError::ParseError(detail) => Self::InvalidResponse { action, detail },
            ClientError::UnencodableCredential => Self::MalformedCredential,
            other @ (ClientError::InvalidApiRoot(_) | ClientError::Build(_)) => Self::Vendor {
                action,
                status: 500,
                message: other.to_string(),
            },
        }
    }
}

/// Startup failures of the gateway process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// TESTS
// =============================================================================
