//! Turns a remote result into the content returned to the caller.
//!
//! A status the operation does not accept as success is reported as content,
//! never raised. Only a success status with an undecodable body is an error.

use devrev_types::{Arguments, ContentItem, RemoteResult};
use serde_json::Value;

use crate::errors::ToolError;
use crate::operation::Operation;

/// Format one remote result. `context` is the caller's original arguments,
/// used to echo identifiers back in the success text.
pub fn format_response(operation: Operation, context: &Arguments, result: &RemoteResult) -> Result<Vec<ContentItem>, ToolError> {
    if !operation.is_success(result.status_code) {
        return Ok(vec![ContentItem::text(failure_text(operation, result))]);
    }

    let decoded = result.json().map_err(|source| ToolError::ResponseDecode {
        label: operation.label(),
        source,
    })?;
    let rendered = serde_json::to_string_pretty(&decoded).unwrap_or_else(|_| result.body.clone());
    Ok(vec![ContentItem::text(success_text(operation, context, &rendered))])
}

pub fn failure_text(operation: Operation, result: &RemoteResult) -> String {
    format!(
        "{} failed with status {}: {}",
        operation.label(),
        result.status_code,
        result.body
    )
}

fn success_text(operation: Operation, context: &Arguments, body: &str) -> String {
    let echo = |key: &str| context.get(key).map(display_value).unwrap_or_default();
    match operation {
        Operation::Search => format!("Search results for '{}':\n{body}", echo("query")),
        Operation::GetCurrentUser => format!("Current user information: {body}"),
        Operation::GetWork => format!("Work information for '{}':\n{body}", echo("id")),
        Operation::GetObject => format!("Object information for '{}':\n{body}", echo("id")),
        Operation::CreateWork => format!("Work created successfully: {body}"),
        Operation::CreateObject => format!("Object created successfully: {body}"),
        Operation::UpdateWork => format!("Work '{}' updated successfully: {body}", echo("id")),
        Operation::UpdateObject => format!("Object '{}' updated successfully: {body}", echo("id")),
        Operation::ListWorks => format!("Works listed successfully: {body}"),
        Operation::GetPart => format!("Part information for '{}':\n{body}", echo("id")),
        Operation::CreatePart => format!("Part created successfully: {body}"),
        Operation::UpdatePart => format!("Part '{}' updated successfully: {body}", echo("id")),
        Operation::CreateTimelineComment => {
            format!("Timeline comment added to '{}': {body}", echo("work_id"))
        }
        Operation::GetTimelineEntries => format!("Timeline entries for '{}':\n{body}", echo("id")),
    }
}

// Strings are echoed without quotes.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
