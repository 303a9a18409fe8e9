//! Shapes request/response pairs into structured tracing payloads.

use serde_json::{Map, Value};

const MAX_LOGGED_PAYLOAD_BYTES: usize = 16 * 1024;

/// Combine request and response into one payload. Returns `None` when both
/// are absent.
pub(crate) fn build_log_payload(request: Option<Value>, response: Option<Value>) -> Option<Value> {
    let mut payload = Map::new();
    if let Some(request_value) = request {
        payload.insert("request".to_string(), request_value);
    }
    if let Some(response_value) = response {
        payload.insert("response".to_string(), response_value);
    }
    if payload.is_empty() { None } else { Some(Value::Object(payload)) }
}

/// Render a payload for a log line, cutting it at a char boundary once it
/// exceeds the size guardrail.
pub(crate) fn render_log_payload(payload: &Value) -> String {
    let rendered = payload.to_string();
    if rendered.len() <= MAX_LOGGED_PAYLOAD_BYTES {
        return rendered;
    }
    let mut cut = MAX_LOGGED_PAYLOAD_BYTES;
    while !rendered.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... ({} bytes truncated)", &rendered[..cut], rendered.len() - cut)
}
