//! Per-operation payload builders.
//!
//! Each builder reads the caller's arguments and assembles the exact body sent
//! to the remote endpoint. Presence checks follow truthiness rather than
//! strict presence: `null`, `false`, `0`, `""`, `[]` and `{}` all count as
//! "not provided", for required and optional fields alike. An explicitly empty
//! `owned_by` on update is therefore indistinguishable from an omitted one.

use devrev_types::{Arguments, OutboundPayload};
use serde_json::{Value, json};

use crate::errors::ToolError;
use crate::operation::Operation;

/// Whether a value counts as provided.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Build the outbound payload for one invocation.
///
/// Pure: no I/O, and the result depends only on the inputs.
pub fn build_payload(operation: Operation, arguments: Option<&Arguments>) -> Result<OutboundPayload, ToolError> {
    let body = match operation {
        Operation::Search => search(operation, arguments)?,
        Operation::GetCurrentUser => Arguments::new(),
        Operation::GetWork | Operation::GetObject | Operation::GetPart => get_by_id(operation, arguments)?,
        Operation::CreateWork | Operation::CreateObject => create_work(operation, arguments)?,
        Operation::UpdateWork => update_work(operation, arguments, true)?,
        Operation::UpdateObject => update_work(operation, arguments, false)?,
        Operation::ListWorks => list_works(operation, arguments)?,
        Operation::CreatePart => create_part(operation, arguments)?,
        Operation::UpdatePart => update_part(operation, arguments)?,
        Operation::CreateTimelineComment => create_timeline_comment(operation, arguments)?,
        Operation::GetTimelineEntries => get_timeline_entries(operation, arguments)?,
    };
    Ok(OutboundPayload::new(operation.endpoint(), body))
}

/// Read access to an arguments map that reports failures against one operation.
struct ArgumentReader<'a> {
    operation: &'static str,
    arguments: &'a Arguments,
}

impl<'a> ArgumentReader<'a> {
    /// Fails with `MissingArguments` when the map is absent or empty.
    fn new(operation: Operation, arguments: Option<&'a Arguments>) -> Result<Self, ToolError> {
        match arguments {
            Some(arguments) if !arguments.is_empty() => Ok(Self {
                operation: operation.name(),
                arguments,
            }),
            _ => Err(ToolError::missing_arguments(operation.name())),
        }
    }

    fn required(&self, key: &'static str) -> Result<Value, ToolError> {
        self.optional(key)
            .ok_or_else(|| ToolError::missing_field(self.operation, key))
    }

    fn optional(&self, key: &str) -> Option<Value> {
        self.arguments.get(key).filter(|value| is_truthy(value)).cloned()
    }

    /// Copy each truthy optional field into `body`, keeping the key.
    fn copy_optional(&self, body: &mut Arguments, keys: &[&'static str]) {
        for key in keys {
            if let Some(value) = self.optional(key) {
                body.insert((*key).to_string(), value);
            }
        }
    }
}

fn search(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    body.insert("query".to_string(), reader.required("query")?);
    body.insert("namespace".to_string(), reader.required("namespace")?);
    Ok(body)
}

fn get_by_id(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    body.insert("id".to_string(), reader.required("id")?);
    Ok(body)
}

fn create_work(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let work_type = reader.required("type")?;
    let title = reader.required("title")?;
    let applies_to_part = reader.required("applies_to_part")?;

    let mut body = Arguments::new();
    body.insert("type".to_string(), work_type);
    body.insert("title".to_string(), title);
    body.insert("body".to_string(), reader.optional("body").unwrap_or_else(|| json!("")));
    body.insert("applies_to_part".to_string(), applies_to_part);
    body.insert("owned_by".to_string(), reader.optional("owned_by").unwrap_or_else(|| json!([])));
    Ok(body)
}

fn update_work(operation: Operation, arguments: Option<&Arguments>, accepts_sprint: bool) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    body.insert("id".to_string(), reader.required("id")?);
    body.insert("type".to_string(), reader.required("type")?);
    reader.copy_optional(&mut body, &["title", "body", "applies_to_part", "owned_by"]);
    if accepts_sprint {
        reader.copy_optional(&mut body, &["sprint"]);
    }
    Ok(body)
}

fn list_works(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    reader.copy_optional(&mut body, &["type", "applies_to_part", "created_by", "owned_by"]);
    if let Some(stage) = reader.optional("stage") {
        body.insert("stage".to_string(), json!({ "name": stage }));
    }
    reader.copy_optional(&mut body, &["state", "limit"]);
    Ok(body)
}

fn create_part(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    body.insert("type".to_string(), reader.required("type")?);
    body.insert("name".to_string(), reader.required("name")?);
    body.insert("owned_by".to_string(), reader.required("owned_by")?);
    body.insert("parent_part".to_string(), reader.required("parent_part")?);
    reader.copy_optional(&mut body, &["description"]);
    Ok(body)
}

fn update_part(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    body.insert("id".to_string(), reader.required("id")?);
    body.insert("type".to_string(), reader.required("type")?);
    reader.copy_optional(
        &mut body,
        &["name", "description", "owned_by", "target_close_date", "target_start_date"],
    );
    Ok(body)
}

fn create_timeline_comment(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let object = reader.required("work_id")?;
    let comment = reader.required("body")?;

    let mut body = Arguments::new();
    body.insert("object".to_string(), object);
    body.insert("type".to_string(), json!("timeline_comment"));
    body.insert("body".to_string(), comment);
    body.insert("body_type".to_string(), json!("text"));
    body.insert("collections".to_string(), json!(["discussions"]));
    body.insert("visibility".to_string(), json!("internal"));
    Ok(body)
}

// One page per call. A cursor continues after the previous page.
fn get_timeline_entries(operation: Operation, arguments: Option<&Arguments>) -> Result<Arguments, ToolError> {
    let reader = ArgumentReader::new(operation, arguments)?;
    let mut body = Arguments::new();
    body.insert("object".to_string(), reader.required("id")?);
    reader.copy_optional(&mut body, &["limit"]);
    if let Some(cursor) = reader.optional("cursor") {
        body.insert("cursor".to_string(), cursor);
        body.insert("mode".to_string(), json!("after"));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn body_of(operation: Operation, value: Value) -> Value {
        let arguments = args(value);
        Value::Object(build_payload(operation, Some(&arguments)).expect("payload").body)
    }

    #[test]
    fn truthiness_mirrors_dynamic_checks() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(5)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(["a"])));
    }

    #[test]
    fn list_works_wraps_stage_only() {
        assert_eq!(
            body_of(Operation::ListWorks, json!({ "stage": ["triage"] })),
            json!({ "stage": { "name": ["triage"] } })
        );
    }

    #[test]
    fn list_works_passes_filters_through_and_drops_falsy_values() {
        let body = body_of(
            Operation::ListWorks,
            json!({ "type": ["issue"], "owned_by": [], "state": ["open"], "limit": 0, "created_by": ["DEVU-1"] }),
        );
        assert_eq!(body, json!({ "type": ["issue"], "created_by": ["DEVU-1"], "state": ["open"] }));
    }

    #[test]
    fn list_works_requires_an_arguments_map() {
        assert!(matches!(
            build_payload(Operation::ListWorks, None),
            Err(ToolError::MissingArguments { operation: "list_works" })
        ));
        let empty = Arguments::new();
        assert!(matches!(
            build_payload(Operation::ListWorks, Some(&empty)),
            Err(ToolError::MissingArguments { .. })
        ));
    }

    #[test]
    fn create_work_fills_defaults() {
        for operation in [Operation::CreateWork, Operation::CreateObject] {
            let body = body_of(operation, json!({ "type": "issue", "title": "t", "applies_to_part": "PART-1" }));
            assert_eq!(
                body,
                json!({ "type": "issue", "title": "t", "body": "", "applies_to_part": "PART-1", "owned_by": [] })
            );
        }
    }

    #[test]
    fn create_work_keeps_supplied_optionals() {
        let body = body_of(
            Operation::CreateWork,
            json!({ "type": "ticket", "title": "t", "applies_to_part": "P", "body": "details", "owned_by": ["DEVU-2"] }),
        );
        assert_eq!(body["body"], json!("details"));
        assert_eq!(body["owned_by"], json!(["DEVU-2"]));
    }

    #[test]
    fn create_work_treats_empty_title_as_missing() {
        let arguments = args(json!({ "type": "issue", "title": "", "applies_to_part": "PART-1" }));
        assert!(matches!(
            build_payload(Operation::CreateWork, Some(&arguments)),
            Err(ToolError::MissingRequiredField { field: "title", .. })
        ));
    }

    #[test]
    fn update_work_adds_no_optional_keys() {
        for operation in [Operation::UpdateWork, Operation::UpdateObject] {
            assert_eq!(
                body_of(operation, json!({ "id": "X", "type": "ticket" })),
                json!({ "id": "X", "type": "ticket" })
            );
        }
    }

    #[test]
    fn update_work_ignores_empty_owned_by() {
        let body = body_of(Operation::UpdateWork, json!({ "id": "X", "type": "issue", "owned_by": [], "title": "new" }));
        assert_eq!(body, json!({ "id": "X", "type": "issue", "title": "new" }));
    }

    #[test]
    fn sprint_is_forwarded_only_by_update_work() {
        let input = json!({ "id": "X", "type": "issue", "sprint": "SPRINT-4" });
        assert_eq!(body_of(Operation::UpdateWork, input.clone())["sprint"], json!("SPRINT-4"));
        assert!(body_of(Operation::UpdateObject, input).get("sprint").is_none());
    }

    #[test]
    fn search_checks_query_before_namespace() {
        let arguments = args(json!({ "namespace": "issue" }));
        assert!(matches!(
            build_payload(Operation::Search, Some(&arguments)),
            Err(ToolError::MissingRequiredField { field: "query", .. })
        ));
    }

    #[test]
    fn get_current_user_ignores_arguments() {
        let payload = build_payload(Operation::GetCurrentUser, None).expect("payload");
        assert_eq!(payload.endpoint, "dev-users.self");
        assert!(payload.body.is_empty());
    }

    #[test]
    fn create_part_requires_owners_and_parents() {
        let arguments = args(json!({ "type": "enhancement", "name": "Login", "owned_by": ["DEVU-1"] }));
        assert!(matches!(
            build_payload(Operation::CreatePart, Some(&arguments)),
            Err(ToolError::MissingRequiredField { field: "parent_part", .. })
        ));
    }

    #[test]
    fn update_part_copies_dates() {
        let body = body_of(
            Operation::UpdatePart,
            json!({ "id": "PART-1", "type": "enhancement", "target_close_date": "2025-06-03T00:00:00Z" }),
        );
        assert_eq!(
            body,
            json!({ "id": "PART-1", "type": "enhancement", "target_close_date": "2025-06-03T00:00:00Z" })
        );
    }

    #[test]
    fn timeline_comment_is_internal_discussion() {
        let payload = build_payload(
            Operation::CreateTimelineComment,
            Some(&args(json!({ "work_id": "ISS-9", "body": "looking into it" }))),
        )
        .expect("payload");
        assert_eq!(payload.endpoint, "timeline-entries.create");
        assert_eq!(
            Value::Object(payload.body),
            json!({
                "object": "ISS-9",
                "type": "timeline_comment",
                "body": "looking into it",
                "body_type": "text",
                "collections": ["discussions"],
                "visibility": "internal"
            })
        );
    }

    #[test]
    fn timeline_entries_key_the_list_by_work_id() {
        let payload = build_payload(Operation::GetTimelineEntries, Some(&args(json!({ "id": "TKT-12" }))))
            .expect("payload");
        assert_eq!(payload.endpoint, "timeline-entries.list");
        assert_eq!(Value::Object(payload.body), json!({ "object": "TKT-12" }));
    }

    #[test]
    fn timeline_entries_continue_after_cursor() {
        let body = body_of(
            Operation::GetTimelineEntries,
            json!({ "id": "TKT-12", "limit": 50, "cursor": "c-2" }),
        );
        assert_eq!(body, json!({ "object": "TKT-12", "limit": 50, "cursor": "c-2", "mode": "after" }));
    }
}
