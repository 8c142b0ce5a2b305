//! # Qarnot MCP Server
//!
//! Implements `ServerHandler` with 8 MCP tools that proxy to the Qarnot
//! HTTP API through the [`TaskGateway`].
//!
//! The inbound HTTP request parts are attached to each tool call's request
//! context by the streamable-HTTP transport; their headers carry the
//! caller's credential.

use crate::error::GatewayError;
use crate::gateway::{TaskGateway, with_cancellation};
use crate::params::{
    ListTasksParams, ProfileRefParams, SubmitTaskParams, TaskLogsParams, TaskRefParams,
};
use axum::http::{HeaderMap, request::Parts};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::{Value, json};

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to the Qarnot HTTP API.
#[derive(Clone)]
pub struct QarnotMcp {
    gateway: TaskGateway,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

/// Headers of the inbound HTTP request behind this tool call.
///
/// Empty when the transport attached none, which fails authentication.
fn inbound_headers(ctx: &RequestContext<RoleServer>) -> HeaderMap {
    ctx.extensions
        .get::<Parts>()
        .map(|parts| parts.headers.clone())
        .unwrap_or_default()
}

/// Turn a gateway outcome into a tool result. Failures become tool errors
/// (`isError: true`) with a structured `{error, message, status?}` body.
fn respond(outcome: Result<Value, GatewayError>) -> CallToolResult {
    match outcome {
        Ok(value) => CallToolResult::structured(value),
        Err(e) => {
            tracing::warn!(kind = e.kind(), status = ?e.status(), "Tool call failed: {}", e);
            CallToolResult::structured_error(e.to_structured())
        }
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| GatewayError::InvalidResponse {
        action: "encode result",
        detail: e.to_string(),
    })
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl QarnotMcp {
    pub fn new(gateway: TaskGateway) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "List all compute tasks for the authenticated user, with status, progress and basic information"
    )]
    async fn list_tasks(
        &self,
        params: Parameters<ListTasksParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            let tasks = self.gateway.list_tasks(&headers, params.0).await?;
            Ok::<_, GatewayError>(json!({ "tasks": to_value(tasks)? }))
        })
        .await;
        Ok(respond(outcome))
    }

    #[tool(description = "Get detailed information about a specific task")]
    async fn get_task(
        &self,
        params: Parameters<TaskRefParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            let task = self.gateway.get_task(&headers, params.0).await?;
            Ok::<_, GatewayError>(json!({ "task": task }))
        })
        .await;
        Ok(respond(outcome))
    }

    #[tool(
        description = "Submit a new compute task to Qarnot. Returns the created task including its UUID"
    )]
    async fn submit_task(
        &self,
        params: Parameters<SubmitTaskParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            let task = self.gateway.submit_task(&headers, params.0).await?;
            Ok::<_, GatewayError>(json!({ "task": task }))
        })
        .await;
        Ok(respond(outcome))
    }

    #[tool(
        description = "Get stdout or stderr logs from a task, optionally for a single instance"
    )]
    async fn get_task_logs(
        &self,
        params: Parameters<TaskLogsParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(
            ctx.ct.cancelled(),
            self.gateway.get_task_logs(&headers, params.0),
        )
        .await;
        match outcome {
            Ok(logs) => Ok(CallToolResult::success(vec![Content::text(logs)])),
            Err(e) => Ok(respond(Err(e))),
        }
    }

    #[tool(description = "Abort a running task. Its state changes to 'Cancelled'")]
    async fn abort_task(
        &self,
        params: Parameters<TaskRefParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            to_value(self.gateway.abort_task(&headers, params.0).await?)
        })
        .await;
        Ok(respond(outcome))
    }

    #[tool(description = "Delete a task. A running task is aborted first")]
    async fn delete_task(
        &self,
        params: Parameters<TaskRefParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            to_value(self.gateway.delete_task(&headers, params.0).await?)
        })
        .await;
        Ok(respond(outcome))
    }

    #[tool(description = "List the computation profiles that can be used when creating tasks")]
    async fn list_profiles(
        &self,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            let profiles = self.gateway.list_profiles(&headers).await?;
            Ok::<_, GatewayError>(json!({ "profiles": profiles }))
        })
        .await;
        Ok(respond(outcome))
    }

    #[tool(description = "Get details of a computation profile, including its constants")]
    async fn get_profile(
        &self,
        params: Parameters<ProfileRefParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let headers = inbound_headers(&ctx);
        let outcome = with_cancellation(ctx.ct.cancelled(), async {
            let profile = self.gateway.get_profile(&headers, params.0).await?;
            Ok::<_, GatewayError>(json!({ "profile": profile }))
        })
        .await;
        Ok(respond(outcome))
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for QarnotMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Qarnot-Manager: manage compute tasks on the Qarnot Computing platform. \
                 List tasks, get task details, submit tasks, read stdout/stderr logs, \
                 abort or delete tasks, and inspect computation profiles. \
                 Authenticate with 'Authorization: Bearer <api key>' or 'X-Api-Key'."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
