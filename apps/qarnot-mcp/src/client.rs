//! # Qarnot HTTP Client
//!
//! Wrapper around the Qarnot REST API for use by the MCP gateway.
//!
//! One pooled `reqwest::Client` is shared by every tool invocation. The
//! caller's credential is attached per request as the raw `Authorization`
//! value the vendor expects, marked sensitive so it never shows up in
//! debug output.

use qarnot_core::{Credential, GatewayConfig, LogStream, ProfileName, TaskSubmission, TaskUuid};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured API root is not a usable URL.
    #[error("Invalid API root '{0}'")]
    InvalidApiRoot(String),

    /// The HTTP client could not be constructed.
    #[error("Cannot build HTTP client: {0}")]
    Build(String),

    /// The credential cannot be carried in an HTTP header.
    #[error("Credential contains characters not allowed in an HTTP header")]
    UnencodableCredential,

    /// Cannot reach the Qarnot API (connect failure, timeout, broken stream).
    #[error("Cannot reach Qarnot at {0}")]
    ConnectionFailed(String),

    /// The API answered with a 4xx or 5xx status.
    #[error("Qarnot API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Failed to read or parse the response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// HTTP client that wraps calls to the Qarnot REST API.
#[derive(Clone)]
pub struct QarnotClient {
    http: reqwest::Client,
    api_root: Url,
}

impl QarnotClient {
    /// Create a client for the versioned API root described by `config`.
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        let root = config.api_root();
        let api_root = Url::parse(&root).map_err(|_| ClientError::InvalidApiRoot(root.clone()))?;
        if api_root.cannot_be_a_base() {
            return Err(ClientError::InvalidApiRoot(root));
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self { http, api_root })
    }

    /// The versioned API root all endpoints hang off.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Append path segments to the API root, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build a request carrying the caller's credential.
    fn request(
        &self,
        method: Method,
        url: Url,
        credential: &Credential,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut key = HeaderValue::from_str(credential.expose())
            .map_err(|_| ClientError::UnencodableCredential)?;
        key.set_sensitive(true);
        tracing::debug!(%method, %url, credential = %credential, "Qarnot API request");
        Ok(self.http.request(method, url).header(AUTHORIZATION, key))
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send().await.map_err(|e| {
            tracing::warn!(error = %e.without_url(), "Qarnot API unreachable");
            ClientError::ConnectionFailed(self.api_root.to_string())
        })
    }

    /// Handle HTTP response: check status codes and decode the body.
    ///
    /// 204 decodes to `null`, JSON content types to a JSON value, anything
    /// else to a JSON string holding the raw body text.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: vendor_message(status, &body),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if is_json {
            resp.json::<Value>()
                .await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            resp.text()
                .await
                .map(Value::String)
                .map_err(|e| ClientError::ParseError(e.to_string()))
        }
    }

    async fn call(&self, req: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    /// GET /tasks, with one `tag` query pair per tag.
    pub async fn list_tasks(
        &self,
        credential: &Credential,
        tags: &[String],
    ) -> Result<Value, ClientError> {
        let mut req = self.request(Method::GET, self.endpoint(&["tasks"]), credential)?;
        if !tags.is_empty() {
            let query: Vec<(&str, &str)> = tags.iter().map(|t| ("tag", t.as_str())).collect();
            req = req.query(&query);
        }
        self.call(req).await
    }

    /// GET /tasks/{uuid}
    pub async fn get_task(
        &self,
        credential: &Credential,
        task: &TaskUuid,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&["tasks", task.as_str()]);
        self.call(self.request(Method::GET, url, credential)?).await
    }

    /// POST /tasks → create and start a task.
    pub async fn create_task(
        &self,
        credential: &Credential,
        submission: &TaskSubmission,
    ) -> Result<Value, ClientError> {
        let req = self
            .request(Method::POST, self.endpoint(&["tasks"]), credential)?
            .json(submission);
        self.call(req).await
    }

    /// POST /tasks/{uuid}/abort
    pub async fn abort_task(
        &self,
        credential: &Credential,
        task: &TaskUuid,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&["tasks", task.as_str(), "abort"]);
        self.call(self.request(Method::POST, url, credential)?).await
    }

    /// DELETE /tasks/{uuid}
    pub async fn delete_task(
        &self,
        credential: &Credential,
        task: &TaskUuid,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&["tasks", task.as_str()]);
        self.call(self.request(Method::DELETE, url, credential)?).await
    }

    /// GET /tasks/{uuid}/{stream}[/{instance}]
    pub async fn task_logs(
        &self,
        credential: &Credential,
        task: &TaskUuid,
        stream: LogStream,
        instance: Option<u32>,
    ) -> Result<Value, ClientError> {
        let instance = instance.map(|i| i.to_string());
        let mut segments = vec!["tasks", task.as_str(), stream.as_str()];
        if let Some(ref i) = instance {
            segments.push(i);
        }
        let url = self.endpoint(&segments);
        self.call(self.request(Method::GET, url, credential)?).await
    }

    /// GET /profiles
    pub async fn list_profiles(&self, credential: &Credential) -> Result<Value, ClientError> {
        let url = self.endpoint(&["profiles"]);
        self.call(self.request(Method::GET, url, credential)?).await
    }

    /// GET /profiles/{name}
    pub async fn get_profile(
        &self,
        credential: &Credential,
        profile: &ProfileName,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&["profiles", profile.as_str()]);
        self.call(self.request(Method::GET, url, credential)?).await
    }
}

/// Best human-readable message from a vendor error body: the JSON `message`
/// field, else the raw text, else the status reason.
fn vendor_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body)
        && let Some(message) = map.get("message").and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

// =============================================================================
// TESTS
// =============================================================================
