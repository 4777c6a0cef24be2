//! Configuration types for the DynamoDB MCP gateway.
//!
//! Configuration is resolved in layers, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `dynamo-mcp.yaml` (optional; a missing file is not an error)
//! 3. Environment variables (`AWS_REGION`, `AWS_PROFILE`, `DYNAMODB_ENDPOINT_URL`)
//! 4. Command-line flags, applied by the binary
//!
//! # Example
//!
//! ```yaml
//! server:
//!   name: dynamodb-mcp
//! aws:
//!   region: us-east-1
//!   endpoint_url: http://localhost:8000
//! logging:
//!   level: debug
//! ```

pub mod aws;
pub mod logging;
pub mod mcp;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use aws::AwsConfig;
pub use logging::LoggingConfig;
pub use mcp::McpConfig;

/// Environment variable overriding the DynamoDB endpoint.
pub const ENDPOINT_URL_ENV: &str = "DYNAMODB_ENDPOINT_URL";

/// Environment variable overriding the region.
pub const REGION_ENV: &str = "AWS_REGION";

/// Environment variable overriding the named profile.
pub const PROFILE_ENV: &str = "AWS_PROFILE";

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// MCP server identity.
    #[serde(default)]
    pub server: McpConfig,

    /// DynamoDB client settings.
    #[serde(default)]
    pub aws: AwsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load the file at `path` if it exists, otherwise fall back to defaults.
    ///
    /// Returns the configuration and whether a file was actually read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<(Self, bool), ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::from_file(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Apply environment overrides using the given lookup function.
    ///
    /// Blank values are ignored and leave the file value in place.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(region) = var(REGION_ENV) {
            self.aws.region = Some(region);
        }
        if let Some(profile) = var(PROFILE_ENV) {
            self.aws.profile = Some(profile);
        }
        if let Some(endpoint) = var(ENDPOINT_URL_ENV) {
            self.aws.endpoint_url = Some(endpoint);
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Check the resolved configuration for values the client cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aws.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(ConfigError::Invalid("aws.region must not be empty".to_string()));
        }

        if let Some(endpoint) = &self.aws.endpoint_url {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "aws.endpoint_url must start with http:// or https://, got '{}'",
                    endpoint
                )));
            }
        }

        if self.server.name.trim().is_empty() {
            return Err(ConfigError::Invalid("server.name must not be empty".to_string()));
        }

        Ok(())
    }
}
