//! Argument validation for MCP tool calls.
//!
//! Validation is a gate, not a transform: on success the caller keeps using
//! the original argument map. Checks, in order, per declared field:
//!
//! - required fields must be present
//! - present fields must have the declared structural kind
//! - enumerated fields must hold one of the allowed values
//!
//! Arguments that the schema does not declare are passed through untouched.

use crate::schema::{FieldKind, FieldSpec, ToolSpec, value_kind};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// VALIDATION ERROR TYPES
// =============================================================================

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// The offending field, if the failure is tied to one.
    pub field: Option<String>,
    /// Human-readable error message.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The arguments were not a JSON object.
    NotAnObject,
    /// A required field is absent.
    MissingField,
    /// A field has the wrong structural kind.
    TypeMismatch,
    /// A field holds a value outside its enumeration.
    InvalidEnum,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        kind: ValidationErrorKind,
        field: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a non-object arguments error.
    pub fn not_an_object(actual: &str) -> Self {
        Self::new(
            ValidationErrorKind::NotAnObject,
            None,
            format!("Tool arguments must be an object, got {}", actual),
        )
    }

    /// Create a missing field error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::MissingField,
            Some(field),
            format!("Missing required field '{}'", field),
        )
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(field: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            ValidationErrorKind::TypeMismatch,
            Some(field),
            format!(
                "Field '{}' must be {}, got {}",
                field, expected, actual
            ),
        )
    }

    /// Create an enumeration violation error.
    pub fn invalid_enum(field: &str, value: &str, allowed: &[&str]) -> Self {
        Self::new(
            ValidationErrorKind::InvalidEnum,
            Some(field),
            format!(
                "Field '{}' has value '{}', expected one of: {}",
                field,
                value,
                allowed.join(", ")
            ),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// ARGUMENT VALIDATOR
// =============================================================================

/// Validates raw tool arguments against a tool's declared fields.
pub struct ArgumentValidator<'a> {
    spec: &'a ToolSpec,
}

impl<'a> ArgumentValidator<'a> {
    /// Create a new validator for a tool.
    pub fn new(spec: &'a ToolSpec) -> Self {
        Self { spec }
    }

    /// Validate a raw argument value.
    ///
    /// `null` is accepted as "no arguments". Any other non-object value is
    /// rejected before individual fields are looked at.
    pub fn validate_value(&self, arguments: &Value) -> Result<Map<String, Value>, ValidationError> {
        let map = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => return Err(ValidationError::not_an_object(value_kind(other))),
        };
        self.validate(&map)?;
        Ok(map)
    }

    /// Validate an argument map.
    pub fn validate(&self, arguments: &Map<String, Value>) -> Result<(), ValidationError> {
        for field in &self.spec.fields {
            match arguments.get(field.name) {
                None if field.required => {
                    return Err(ValidationError::missing_field(field.name));
                }
                None => {}
                Some(value) => self.validate_field(field, value)?,
            }
        }

        Ok(())
    }

    fn validate_field(&self, field: &FieldSpec, value: &Value) -> Result<(), ValidationError> {
        if !field.kind.matches(value) {
            let actual = match (field.kind, value) {
                (FieldKind::StringArray, Value::Array(_)) => "array containing non-strings",
                (_, other) => value_kind(other),
            };
            return Err(ValidationError::type_mismatch(
                field.name,
                field.kind.name(),
                actual,
            ));
        }

        if let (Some(allowed), Some(text)) = (field.allowed_values, value.as_str()) {
            if !allowed.contains(&text) {
                return Err(ValidationError::invalid_enum(field.name, text, allowed));
            }
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
