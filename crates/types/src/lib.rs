//! Shared type definitions for the DevRev MCP adapter.
//!
//! The catalog types ([`FieldKind`], [`FieldSpec`], [`OperationDescriptor`])
//! describe the tools exposed to MCP callers. The invocation types
//! ([`InvocationRequest`], [`OutboundPayload`], [`RemoteResult`],
//! [`ContentItem`]) live for the duration of a single tool call.

mod invocation;

pub use invocation::{Arguments, ContentItem, ContentKind, InvocationRequest, OutboundPayload, RemoteResult};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Value shape accepted for a single tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A plain string.
    String,
    /// A JSON integer.
    Integer,
    /// An array of strings.
    StringArray,
    /// A string restricted to the listed values.
    Enum(&'static [&'static str]),
    /// An array whose items are restricted to the listed values.
    EnumArray(&'static [&'static str]),
}

impl FieldKind {
    /// Render the JSON-Schema fragment for this kind, without a description.
    pub fn json_schema(&self) -> Map<String, Value> {
        let value = match self {
            FieldKind::String => json!({ "type": "string" }),
            FieldKind::Integer => json!({ "type": "integer" }),
            FieldKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
            FieldKind::EnumArray(values) => json!({
                "type": "array",
                "items": { "type": "string", "enum": values }
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Describes one argument of an operation.
///
/// Field specs document the contract published to callers. Required-ness is
/// enforced by each operation's payload builder, not by a generic validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Argument key as it appears in the caller's arguments map.
    pub key: &'static str,
    /// Accepted value shape.
    pub kind: FieldKind,
    /// Whether the argument must be supplied (and truthy).
    pub required: bool,
    /// Optional human-readable description published in the schema.
    pub description: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            required: true,
            description: None,
        }
    }

    pub const fn optional(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            required: false,
            description: None,
        }
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Render the JSON-Schema property for this field.
    pub fn json_schema(&self) -> Map<String, Value> {
        let mut schema = self.kind.json_schema();
        if let Some(description) = self.description {
            schema.insert("description".to_string(), Value::String(description.to_string()));
        }
        schema
    }
}

/// Immutable description of a tool exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Declared arguments, in publication order.
    pub input_contract: &'static [FieldSpec],
}

impl OperationDescriptor {
    /// Keys of the required arguments, in declaration order.
    pub fn required_keys(&self) -> Vec<&'static str> {
        self.input_contract
            .iter()
            .filter(|field| field.required)
            .map(|field| field.key)
            .collect()
    }

    /// Look up a declared argument by key.
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.input_contract.iter().find(|field| field.key == key)
    }

    /// Build the `inputSchema` object published on the wire.
    ///
    /// The shape is `{"type": "object", "properties": {...}, "required": [...]}`
    /// with properties kept in declaration order.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .input_contract
            .iter()
            .map(|field| (field.key.to_string(), Value::Object(field.json_schema())))
            .collect();
        let required: Vec<Value> = self
            .required_keys()
            .into_iter()
            .map(|key| Value::String(key.to_string()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), Value::Array(required));
        schema
    }
}

impl Serialize for OperationDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OperationDescriptor", 3)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("description", self.description)?;
        state.serialize_field("inputSchema", &self.input_schema())?;
        state.end()
    }
}
