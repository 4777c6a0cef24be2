//! # dynamo-core
//!
//! Configuration shared by the DynamoDB MCP gateway crates.
//!
//! The gateway reads an optional `dynamo-mcp.yaml`, layers a few environment
//! variables over it, and finally applies command-line overrides in the
//! binary. Everything here is plain data; no component mutates a loaded
//! configuration after startup.

// Configuration types shared across all gateway crates
pub mod config;

pub use config::{AwsConfig, ConfigError, GatewayConfig, LoggingConfig, McpConfig};
