//! Tool input schemas.
//!
//! Every tool declares its arguments as an ordered list of [`FieldSpec`]s.
//! The same declaration drives both the JSON Schema advertised through
//! `tools/list` and the local argument validator, so the two never drift.

use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde_json::{Map, Value, json};
use std::fmt;

/// Structural kind of an argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Object,
    /// An array whose every element is a string.
    StringArray,
}

impl FieldKind {
    /// Check whether a JSON value has this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    /// Name used in validation messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::StringArray => "array of strings",
        }
    }

    /// JSON Schema fragment for this kind.
    fn json_schema(self) -> Map<String, Value> {
        let mut schema = Map::new();
        match self {
            FieldKind::String => {
                schema.insert("type".into(), json!("string"));
            }
            FieldKind::Number => {
                schema.insert("type".into(), json!("number"));
            }
            FieldKind::Boolean => {
                schema.insert("type".into(), json!("boolean"));
            }
            FieldKind::Object => {
                schema.insert("type".into(), json!("object"));
            }
            FieldKind::StringArray => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({"type": "string"}));
            }
        }
        schema
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describe the structural kind of an arbitrary JSON value.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declaration of a single tool argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Enumeration constraint; only meaningful for string fields.
    pub allowed_values: Option<&'static [&'static str]>,
    pub description: &'static str,
}

impl FieldSpec {
    /// A required field.
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            allowed_values: None,
            description,
        }
    }

    /// An optional field.
    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            allowed_values: None,
            description,
        }
    }

    /// Restrict the field to a fixed set of string values.
    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = Some(values);
        self
    }

    fn json_schema(&self) -> Value {
        let mut schema = self.kind.json_schema();
        schema.insert("description".into(), json!(self.description));
        if let Some(values) = self.allowed_values {
            schema.insert("enum".into(), json!(values));
        }
        Value::Object(schema)
    }
}

/// Declaration of a tool: identity, description and ordered input fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Whether the tool never mutates remote state.
    pub read_only: bool,
}

impl ToolSpec {
    /// Look up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the required fields, in declaration order.
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    /// Render the input schema as a JSON Schema object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.json_schema());
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_fields(),
        })
    }

    /// Convert to the wire representation used by `tools/list`.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            input_schema: self.input_schema(),
            annotations: self.read_only.then(|| ToolAnnotations {
                read_only_hint: Some(true),
            }),
        }
    }
}
