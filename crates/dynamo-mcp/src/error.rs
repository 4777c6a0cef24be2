//! Error types for the MCP crate.
//!
//! Per-request failures never surface as [`McpError`]; they are folded into
//! a [`ResultEnvelope`](crate::envelope::ResultEnvelope) instead. This type
//! covers registry setup and transport stream faults only.

use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// A tool name was registered twice.
    #[error("tool already registered: {name}")]
    DuplicateTool { name: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error on the transport streams.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
