//! # Tool Argument Types
//!
//! Validated task and profile references, log stream selection, the task
//! submission descriptor, and the task summary shape returned by
//! `list_tasks`.

use crate::error::ArgumentError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// REFERENCES
// =============================================================================

/// Length of the hyphenated `8-4-4-4-12` form.
const HYPHENATED_UUID_LEN: usize = 36;

/// A hyphenated UUID task reference, forwarded verbatim.
///
/// The simple, braced and `urn:uuid:` spellings are rejected rather than
/// rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUuid(String);

impl TaskUuid {
    pub fn parse(raw: &str) -> Result<Self, ArgumentError> {
        if raw.len() != HYPHENATED_UUID_LEN || uuid::Uuid::parse_str(raw).is_err() {
            return Err(ArgumentError::InvalidTaskUuid(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A profile name, usable as a single URL path segment, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileName(String);

impl ProfileName {
    pub fn parse(raw: &str) -> Result<Self, ArgumentError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') || trimmed == "." || trimmed == ".." {
            return Err(ArgumentError::InvalidProfileName(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// LOG STREAM
// =============================================================================

/// Which output stream of a task to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogStream {
    #[default]
    Stdout,
    Stderr,
}

impl LogStream {
    /// Path segment used by the vendor API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl FromStr for LogStream {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            other => Err(ArgumentError::InvalidLogType(other.to_string())),
        }
    }
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TASK SUBMISSION
// =============================================================================

/// A `{key, value}` constant passed to the task's execution profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    pub key: String,
    pub value: String,
}

/// Task descriptor as sent to the vendor. Absent optional fields are
/// omitted; present values pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_buckets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constants: Option<Vec<Constant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskSubmission {
    /// Reject descriptors the vendor could never accept.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.name.trim().is_empty() {
            return Err(ArgumentError::InvalidSubmission("name must not be empty"));
        }
        if self.instance_count == Some(0) {
            return Err(ArgumentError::InvalidSubmission(
                "instance_count must be at least 1",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TASK SUMMARY
// =============================================================================

/// One entry of a `list_tasks` result.
///
/// Read from the vendor's camelCase record, written back in snake_case.
/// Missing fields become `null`; values are never reinterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    #[serde(default)]
    pub uuid: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub shortname: Value,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub progress: Value,
    #[serde(default)]
    pub profile: Value,
    #[serde(default, rename(deserialize = "instanceCount"))]
    pub instance_count: Value,
    #[serde(default, rename(deserialize = "runningInstanceCount"))]
    pub running_instance_count: Value,
    #[serde(default, rename(deserialize = "creationDate"))]
    pub creation_date: Value,
    #[serde(default, rename(deserialize = "endDate"))]
    pub end_date: Value,
    #[serde(default)]
    pub tags: Value,
}

// =============================================================================
// TESTS
// =============================================================================
