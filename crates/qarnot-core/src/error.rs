//! # Error Types
//!
//! Failures detected locally, before any request leaves the gateway.
//!
//! - No silent failures
//! - Messages never carry credential values

use thiserror::Error;

/// No usable credential was found on the inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Neither `Authorization: Bearer` nor `X-Api-Key` yielded a token.
    #[error(
        "Authentication required. Provide an API key via 'Authorization: Bearer <key>' or 'X-Api-Key'."
    )]
    Missing,
}

/// A tool argument was rejected before any outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The task reference is not UUID-shaped.
    #[error("Invalid task UUID: '{0}'")]
    InvalidTaskUuid(String),

    /// The profile name is empty or contains a path separator.
    #[error("Invalid profile name: '{0}'")]
    InvalidProfileName(String),

    /// The log stream selector is neither `stdout` nor `stderr`.
    #[error("log_type must be 'stdout' or 'stderr', got '{0}'")]
    InvalidLogType(String),

    /// The submission descriptor is unusable.
    #[error("Invalid task submission: {0}")]
    InvalidSubmission(&'static str),
}

/// The gateway configuration could not be built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value failed validation.
    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// The configuration file could not be read.
    #[error("Cannot read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("Cannot parse configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
