//! # Task Gateway
//!
//! The eight tool operations, each a stateless translation of one inbound
//! call into exactly one outbound Qarnot call:
//!
//! ```text
//! inbound headers ──> credential ──> argument validation ──> Qarnot call ──> reshaped result
//! ```
//!
//! The credential is checked first; nothing leaves the process without one.

use crate::client::{ClientError, QarnotClient};
use crate::error::GatewayError;
use crate::params::{
    ListTasksParams, ProfileRefParams, SubmitTaskParams, TaskLogsParams, TaskRefParams,
};
use axum::http::HeaderMap;
use qarnot_core::{
    Credential, LogStream, ProfileName, TaskSubmission, TaskSummary, TaskUuid, extract_credential,
};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

/// Result of `abort_task` and `delete_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub status: &'static str,
    pub message: String,
}

impl Confirmation {
    fn success(message: String) -> Self {
        Self {
            status: "success",
            message,
        }
    }
}

/// Gateway between MCP tool calls and the Qarnot REST API.
#[derive(Clone)]
pub struct TaskGateway {
    client: QarnotClient,
}

impl TaskGateway {
    pub fn new(client: QarnotClient) -> Self {
        Self { client }
    }

    /// Locate the caller's credential on the inbound headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Credential, GatewayError> {
        let (credential, carrier) =
            extract_credential(|name| headers.get(name).and_then(|v| v.to_str().ok()))?;
        tracing::debug!(carrier, credential = %credential, "API key extracted");
        Ok(credential)
    }

    /// List tasks, optionally filtered by tags.
    pub async fn list_tasks(
        &self,
        headers: &HeaderMap,
        params: ListTasksParams,
    ) -> Result<Vec<TaskSummary>, GatewayError> {
        let credential = self.authenticate(headers)?;
        let tags = params.tags.unwrap_or_default();
        tracing::info!(action = "list_tasks", ?tags);

        let raw = self
            .client
            .list_tasks(&credential, &tags)
            .await
            .map_err(|e| GatewayError::from_client("list tasks", e))?;
        let tasks: Vec<TaskSummary> = match raw {
            Value::Null => Vec::new(),
            other => serde_json::from_value(other).map_err(|e| GatewayError::InvalidResponse {
                action: "list tasks",
                detail: e.to_string(),
            })?,
        };

        tracing::info!(action = "list_tasks", count = tasks.len(), "Found tasks");
        Ok(tasks)
    }

    /// Fetch one task's full record.
    pub async fn get_task(
        &self,
        headers: &HeaderMap,
        params: TaskRefParams,
    ) -> Result<Value, GatewayError> {
        let credential = self.authenticate(headers)?;
        let task = TaskUuid::parse(&params.task_uuid)?;
        tracing::info!(action = "get_task", task = %task);

        let record = self
            .client
            .get_task(&credential, &task)
            .await
            .map_err(|e| task_error("get task", &task, e))?;

        tracing::info!(
            action = "get_task",
            name = ?record.get("name"),
            state = ?record.get("state"),
            "Retrieved task"
        );
        Ok(record)
    }

    /// Create and start a task from a submission descriptor.
    pub async fn submit_task(
        &self,
        headers: &HeaderMap,
        params: SubmitTaskParams,
    ) -> Result<Value, GatewayError> {
        let credential = self.authenticate(headers)?;
        let submission = TaskSubmission::from(params);
        submission.validate()?;
        tracing::info!(
            action = "submit_task",
            name = %submission.name,
            profile = ?submission.profile
        );

        let created = self
            .client
            .create_task(&credential, &submission)
            .await
            .map_err(|e| GatewayError::from_client("submit task", e))?;

        tracing::info!(action = "submit_task", uuid = ?created.get("uuid"), "Created task");
        Ok(created)
    }

    /// Read a task's stdout or stderr, for the whole task or one instance.
    pub async fn get_task_logs(
        &self,
        headers: &HeaderMap,
        params: TaskLogsParams,
    ) -> Result<String, GatewayError> {
        let credential = self.authenticate(headers)?;
        let task = TaskUuid::parse(&params.task_uuid)?;
        let stream = match params.log_type.as_deref() {
            Some(raw) => raw.parse::<LogStream>()?,
            None => LogStream::default(),
        };
        tracing::info!(
            action = "get_task_logs",
            task = %task,
            stream = %stream,
            instance = ?params.instance_id
        );

        let raw = self
            .client
            .task_logs(&credential, &task, stream, params.instance_id)
            .await
            .map_err(|e| match e {
                ClientError::Status { status: 404, .. } => {
                    GatewayError::TaskOrInstanceNotFound(task.to_string())
                }
                other => GatewayError::from_client("get logs", other),
            })?;

        let logs = match raw {
            Value::Null => String::new(),
            Value::String(text) => text,
            other => other.to_string(),
        };
        tracing::info!(action = "get_task_logs", chars = logs.len(), stream = %stream, "Retrieved logs");

        if logs.is_empty() {
            Ok(format!("No {stream} output available"))
        } else {
            Ok(logs)
        }
    }

    /// Stop a running task.
    pub async fn abort_task(
        &self,
        headers: &HeaderMap,
        params: TaskRefParams,
    ) -> Result<Confirmation, GatewayError> {
        let credential = self.authenticate(headers)?;
        let task = TaskUuid::parse(&params.task_uuid)?;
        tracing::info!(action = "abort_task", task = %task);

        self.client
            .abort_task(&credential, &task)
            .await
            .map_err(|e| match e {
                ClientError::Status { status: 403, .. } => {
                    GatewayError::AbortRejected(task.to_string())
                }
                other => task_error("abort task", &task, other),
            })?;

        tracing::info!(action = "abort_task", task = %task, "Aborted task");
        Ok(Confirmation::success(format!("Task {task} has been aborted")))
    }

    /// Remove a task; the vendor aborts it first if it is still running.
    pub async fn delete_task(
        &self,
        headers: &HeaderMap,
        params: TaskRefParams,
    ) -> Result<Confirmation, GatewayError> {
        let credential = self.authenticate(headers)?;
        let task = TaskUuid::parse(&params.task_uuid)?;
        tracing::info!(action = "delete_task", task = %task);

        self.client
            .delete_task(&credential, &task)
            .await
            .map_err(|e| task_error("delete task", &task, e))?;

        tracing::info!(action = "delete_task", task = %task, "Deleted task");
        Ok(Confirmation::success(format!("Task {task} has been deleted")))
    }

    /// List the execution profiles available to the caller.
    pub async fn list_profiles(&self, headers: &HeaderMap) -> Result<Vec<Value>, GatewayError> {
        let credential = self.authenticate(headers)?;
        tracing::info!(action = "list_profiles");

        let profiles = match self
            .client
            .list_profiles(&credential)
            .await
            .map_err(|e| GatewayError::from_client("list profiles", e))?
        {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(GatewayError::InvalidResponse {
                    action: "list profiles",
                    detail: format!("expected an array, got {other}"),
                });
            }
        };

        tracing::info!(action = "list_profiles", count = profiles.len(), "Found profiles");
        Ok(profiles)
    }

    /// Fetch one execution profile.
    pub async fn get_profile(
        &self,
        headers: &HeaderMap,
        params: ProfileRefParams,
    ) -> Result<Value, GatewayError> {
        let credential = self.authenticate(headers)?;
        let profile = ProfileName::parse(&params.profile_name)?;
        tracing::info!(action = "get_profile", profile = %profile);

        let record = self
            .client
            .get_profile(&credential, &profile)
            .await
            .map_err(|e| match e {
                ClientError::Status { status: 404, .. } => {
                    GatewayError::ProfileNotFound(profile.to_string())
                }
                other => GatewayError::from_client("get profile", other),
            })?;

        tracing::info!(action = "get_profile", profile = %profile, "Retrieved profile");
        Ok(record)
    }
}

/// Map a client failure on a single-task operation; 404 means no such task.
fn task_error(action: &'static str, task: &TaskUuid, err: ClientError) -> GatewayError {
    match err {
        ClientError::Status { status: 404, .. } => GatewayError::TaskNotFound(task.to_string()),
        other => GatewayError::from_client(action, other),
    }
}

/// Race `work` against `cancelled`; cancellation drops the in-flight call.
pub async fn with_cancellation<T, C, W>(cancelled: C, work: W) -> Result<T, GatewayError>
where
    C: Future<Output = ()>,
    W: Future<Output = Result<T, GatewayError>>,
{
    tokio::select! {
        biased;
        () = cancelled => {
            tracing::info!("Tool invocation cancelled");
            Err(GatewayError::Cancelled)
        }
        result = work => result,
    }
}
