//! MCP server configuration.
//!
//! Identity the gateway advertises in its `initialize` reply.

use serde::{Deserialize, Serialize};

/// Configuration for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct McpConfig {
    /// Server name reported as `serverInfo.name`.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Protocol revision reported as `protocolVersion`.
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            protocol_version: default_protocol_version(),
        }
    }
}

fn default_server_name() -> String {
    "dynamodb-mcp".to_string()
}

fn default_protocol_version() -> String {
    "2024-11-05".to_string()
}
