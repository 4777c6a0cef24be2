//! The uniform result envelope returned for every tool call.
//!
//! ```json
//! {"success": true, "message": "Item retrieved successfully", "item": null}
//! {"success": false, "message": "...", "errorKind": "validation"}
//! ```
//!
//! Payload fields are flattened next to `success` and `message`.

use crate::client::ServiceError;
use crate::validator::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Discriminator for failed calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    /// The tool name is not in the registry.
    UnknownTool,
    /// Arguments failed schema validation.
    Validation,
    /// Arguments passed the schema but could not form a service request.
    InvalidRequest,
    /// The external service rejected or failed the call.
    Service,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GatewayErrorKind::UnknownTool => "unknown_tool",
            GatewayErrorKind::Validation => "validation",
            GatewayErrorKind::InvalidRequest => "invalid_request",
            GatewayErrorKind::Service => "service",
        };
        f.write_str(name)
    }
}

/// Result of a single tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(rename = "errorKind", default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<GatewayErrorKind>,
    #[serde(rename = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ResultEnvelope {
    /// A successful result with no payload yet.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            error_code: None,
            payload: Map::new(),
        }
    }

    /// Attach a payload field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// Attach a payload field only when a value is present.
    pub fn with_opt(self, key: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// A failed result.
    pub fn failure(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_kind: Some(kind),
            error_code: None,
            payload: Map::new(),
        }
    }

    /// Failure for a tool name that is not registered.
    pub fn unknown_tool(name: &str) -> Self {
        Self::failure(GatewayErrorKind::UnknownTool, format!("Unknown tool: {}", name))
    }

    /// Failure for arguments rejected by the validator.
    pub fn validation(tool: &str, err: &ValidationError) -> Self {
        Self::failure(
            GatewayErrorKind::Validation,
            format!("Invalid arguments for {}: {}", tool, err),
        )
    }

    /// Failure reported by the external service, prefixed with what was attempted.
    pub fn service(context: &str, err: &ServiceError) -> Self {
        let mut envelope = Self::failure(
            GatewayErrorKind::Service,
            format!("Error {}: {}", context, err),
        );
        envelope.error_code = err.code.clone();
        envelope
    }

    /// Serialize to the JSON text carried in the reply content block.
    pub fn to_json_text(&self) -> String {
        // A map of JSON values cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!("{{\"success\":{},\"message\":\"unserializable result\"}}", self.success)
        })
    }
}
