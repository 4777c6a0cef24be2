//! # dynamo-mcp
//!
//! MCP (Model Context Protocol) tool gateway for Amazon DynamoDB.
//!
//! The gateway exposes a fixed catalog of twelve table-management and item
//! tools to an AI agent over a line-delimited JSON-RPC stdio transport.
//! Every call yields one JSON result envelope; no per-call failure ever
//! stops the server.
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (list tools / call tool)
//!       ▼
//! ┌──────────────────────┐
//! │  McpServer (stdio)   │
//! │  1. Look up tool     │  ← ToolRegistry
//! │  2. Validate args    │  ← ArgumentValidator
//! │  3. Build request    │  ← ToolExecutor
//! │  4. One service call │  ← DynamoBackend
//! │  5. Return envelope  │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!         DynamoDB
//! ```
//!
//! ## Tools
//!
//! | Tool | Read-only |
//! |------|-----------|
//! | `create_table`, `create_gsi`, `update_gsi`, `create_lsi`, `update_capacity` | no |
//! | `list_tables`, `describe_table` | yes |
//! | `put_item`, `update_item` | no |
//! | `get_item`, `query_table`, `scan_table` | yes |
//!
//! There are no delete tools.
//!
//! ## Example Usage
//!
//! ```ignore
//! use dynamo_core::GatewayConfig;
//! use dynamo_mcp::{Dispatcher, McpServer, SdkBackend};
//! use std::sync::Arc;
//!
//! let config = GatewayConfig::default();
//! let backend = SdkBackend::from_config(&config.aws).await;
//! let dispatcher = Dispatcher::with_catalog(Arc::new(backend));
//!
//! McpServer::new(config.server, dispatcher).run_stdio().await?;
//! ```

pub mod attribute;
pub mod client;
pub mod describe;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod tools;
pub mod validator;


// Re-export main types
pub use client::{DynamoBackend, SdkBackend, ServiceError};
pub use dispatcher::Dispatcher;
pub use envelope::{GatewayErrorKind, ResultEnvelope};
pub use error::McpError;
pub use executor::{AdapterError, ToolExecutor};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolAnnotations,
    ToolContent, ToolDefinition,
};
pub use schema::{FieldKind, FieldSpec, ToolSpec};
pub use server::McpServer;
pub use tools::{Tool, ToolRegistry};
pub use validator::{ArgumentValidator, ValidationError, ValidationErrorKind};
