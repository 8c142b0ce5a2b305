//! Fake Qarnot API for integration tests.
//!
//! Records every request it receives and answers each one with a single
//! scripted response.

#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use qarnot_core::GatewayConfig;
use qarnot_mcp::{QarnotClient, TaskGateway};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One request as seen by the fake vendor.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct Script {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: String,
}

#[derive(Clone)]
struct VendorState {
    calls: Arc<Mutex<Vec<Recorded>>>,
    script: Script,
}

/// A running fake vendor bound to an ephemeral port.
pub struct FakeVendor {
    pub base_url: String,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeVendor {
    /// Reply with a JSON body.
    pub async fn json(status: StatusCode, body: Value) -> Self {
        Self::start(Script {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        })
        .await
    }

    /// Reply with a plain-text body.
    pub async fn text(status: StatusCode, body: &str) -> Self {
        Self::start(Script {
            status,
            content_type: Some("text/plain"),
            body: body.to_string(),
        })
        .await
    }

    /// Reply with no body at all.
    pub async fn empty(status: StatusCode) -> Self {
        Self::start(Script {
            status,
            content_type: None,
            body: String::new(),
        })
        .await
    }

    async fn start(script: Script) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = VendorState {
            calls: Arc::clone(&calls),
            script,
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The single request received; panics unless exactly one arrived.
    pub fn only_call(&self) -> Recorded {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one outbound call");
        calls.into_iter().next().unwrap()
    }

    /// A gateway whose outbound calls land on this fake vendor.
    pub fn gateway(&self) -> TaskGateway {
        gateway_for(&self.base_url)
    }
}

async fn record(
    State(state): State<VendorState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    state.calls.lock().unwrap().push(recorded);

    let script = state.script;
    match script.content_type {
        Some(ct) => (script.status, [(header::CONTENT_TYPE, ct)], script.body).into_response(),
        None => script.status.into_response(),
    }
}

/// A gateway pointed at an arbitrary base URL.
pub fn gateway_for(base_url: &str) -> TaskGateway {
    let config = GatewayConfig {
        base_url: base_url.to_string(),
        ..GatewayConfig::default()
    };
    TaskGateway::new(QarnotClient::new(&config).unwrap())
}

/// Inbound headers carrying `Authorization: Bearer <token>`.
pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    headers
}

/// Inbound headers carrying `X-Api-Key: <token>`.
pub fn api_key(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", token.parse().unwrap());
    headers
}

pub const TASK_UUID: &str = "2f2a8d6e-0a4b-4c1e-9d3f-6b5a7c8d9e0f";
