//! Per-invocation values: requests, outbound payloads, remote results and
//! the content returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied tool arguments.
pub type Arguments = Map<String, Value>;

/// A single tool call as received from the control channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub operation_name: String,
    #[serde(default)]
    pub arguments: Option<Arguments>,
}

impl InvocationRequest {
    pub fn new(operation_name: impl Into<String>, arguments: Option<Arguments>) -> Self {
        Self {
            operation_name: operation_name.into(),
            arguments,
        }
    }
}

/// Request body destined for one remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayload {
    /// Remote endpoint name, e.g. `works.create`.
    pub endpoint: &'static str,
    /// JSON body sent to the endpoint.
    pub body: Arguments,
}

impl OutboundPayload {
    pub fn new(endpoint: &'static str, body: Arguments) -> Self {
        Self { endpoint, body }
    }
}

/// Status code and raw body returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResult {
    pub status_code: u16,
    pub body: String,
}

impl RemoteResult {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
}

/// Content returned to the caller of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub text: String,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            text: text.into(),
        }
    }
}
