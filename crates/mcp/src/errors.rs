//! Tool invocation errors and their MCP protocol representation.
//!
//! Local failures (bad arguments, unknown tool) and transport failures are
//! raised as protocol errors. Remote API failures with a status code never
//! reach this module; they are reported as content by [`crate::format`].

use chrono::Utc;
use devrev_api::ApiError;
use rmcp::model::ErrorData;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing arguments")]
    MissingArguments { operation: &'static str },

    #[error("Missing {field} parameter")]
    MissingRequiredField { operation: &'static str, field: &'static str },

    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    #[error(transparent)]
    RemoteCall(#[from] ApiError),

    #[error("{label} returned a response body that is not valid JSON: {source}")]
    ResponseDecode {
        label: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    pub fn missing_arguments(operation: &'static str) -> Self {
        Self::MissingArguments { operation }
    }

    pub fn missing_field(operation: &'static str, field: &'static str) -> Self {
        Self::MissingRequiredField { operation, field }
    }

    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// True for "called wrong" errors raised before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ToolError::MissingArguments { .. } | ToolError::MissingRequiredField { .. } | ToolError::UnknownOperation { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::MissingArguments { .. } => "MISSING_ARGUMENTS",
            ToolError::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            ToolError::UnknownOperation { .. } => "UNKNOWN_OPERATION",
            ToolError::RemoteCall(_) => "REMOTE_CALL_FAILED",
            ToolError::ResponseDecode { .. } => "RESPONSE_DECODE_FAILED",
        }
    }

    fn context(&self) -> Value {
        match self {
            ToolError::MissingArguments { operation } => json!({ "tool": operation }),
            ToolError::MissingRequiredField { operation, field } => json!({ "tool": operation, "field": field }),
            ToolError::UnknownOperation { name } => json!({ "tool": name }),
            ToolError::RemoteCall(ApiError::Transport { endpoint, .. }) => json!({ "endpoint": endpoint }),
            ToolError::RemoteCall(ApiError::Timeout { endpoint, timeout_ms }) => {
                json!({ "endpoint": endpoint, "timeout_ms": timeout_ms })
            }
            ToolError::ResponseDecode { label, .. } => json!({ "operation": label }),
        }
    }

    fn suggested_action(&self) -> &'static str {
        match self {
            ToolError::MissingArguments { .. } | ToolError::MissingRequiredField { .. } => {
                "Supply every field listed in the tool's inputSchema.required."
            }
            ToolError::UnknownOperation { .. } => "Call tools/list and use one of the published tool names.",
            ToolError::RemoteCall(_) => "Check network access to the DevRev API and try again.",
            ToolError::ResponseDecode { .. } => "Inspect the DevRev API response; the endpoint did not return JSON.",
        }
    }
}

fn build_error_data(error_code: &str, category: &str, message: &str, context: Value, suggested_action: &str) -> Value {
    json!({
        "error_code": error_code,
        "category": category,
        "message": message,
        "context": context,
        "retryable": false,
        "suggested_action": suggested_action,
        "correlation_id": format!("devrev-{}", Utc::now().timestamp_millis()),
    })
}

impl From<ToolError> for ErrorData {
    fn from(error: ToolError) -> Self {
        let message = error.to_string();
        let category = if error.is_local() { "validation" } else { "execution" };
        let data = build_error_data(
            error.error_code(),
            category,
            &message,
            error.context(),
            error.suggested_action(),
        );
        if error.is_local() {
            ErrorData::invalid_params(message, Some(data))
        } else {
            ErrorData::internal_error(message, Some(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn messages_name_the_missing_field() {
        assert_eq!(ToolError::missing_field("search", "query").to_string(), "Missing query parameter");
        assert_eq!(ToolError::missing_arguments("get_part").to_string(), "Missing arguments");
        assert_eq!(ToolError::unknown_operation("nope").to_string(), "Unknown tool: nope");
    }

    #[test]
    fn validation_errors_map_to_invalid_params() {
        let data: ErrorData = ToolError::missing_field("create_part", "owned_by").into();
        assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
        let payload = data.data.expect("structured data");
        assert_eq!(payload["error_code"], json!("MISSING_REQUIRED_FIELD"));
        assert_eq!(payload["category"], json!("validation"));
        assert_eq!(payload["context"]["field"], json!("owned_by"));
    }

    #[test]
    fn transport_errors_map_to_internal_error() {
        let data: ErrorData = ToolError::from(ApiError::transport("works.get", "connection refused")).into();
        assert_eq!(data.code, ErrorCode::INTERNAL_ERROR);
        let payload = data.data.expect("structured data");
        assert_eq!(payload["category"], json!("execution"));
        assert_eq!(payload["context"]["endpoint"], json!("works.get"));
    }

    #[test]
    fn only_argument_and_routing_errors_are_local() {
        assert!(ToolError::unknown_operation("x").is_local());
        assert!(!ToolError::from(ApiError::transport("works.get", "boom")).is_local());
    }
}
