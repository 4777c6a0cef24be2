//! CLI command implementations for the DynamoDB MCP server.

pub mod call;
pub mod serve;
pub mod tools;

use anyhow::{Context, Result};
use clap::Args;
use dynamo_core::GatewayConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Options shared by every command that talks to DynamoDB.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Path to the configuration file (missing file means defaults)
    #[arg(long, env = "DYNAMO_MCP_CONFIG", default_value = "dynamo-mcp.yaml")]
    pub config: PathBuf,

    /// AWS region, overriding the config file and the AWS default chain
    #[arg(long)]
    pub region: Option<String>,

    /// DynamoDB endpoint, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long = "endpoint-url")]
    pub endpoint_url: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl GatewayArgs {
    /// Resolve configuration (file, then environment, then flags) and start
    /// logging with the resulting level.
    pub fn load(&self) -> Result<GatewayConfig> {
        let (mut config, from_file) = GatewayConfig::load_or_default(&self.config)
            .with_context(|| format!("Failed to load configuration from {:?}", self.config))?;
        config.apply_env();

        if let Some(region) = &self.region {
            config.aws.region = Some(region.clone());
        }
        if let Some(endpoint) = &self.endpoint_url {
            config.aws.endpoint_url = Some(endpoint.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        init_tracing(&config.logging.level);

        if from_file {
            tracing::info!(path = %self.config.display(), "Loaded configuration");
        } else {
            tracing::warn!(
                path = %self.config.display(),
                "Configuration file not found, using defaults"
            );
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Install the global subscriber. Output goes to stderr; stdout carries
/// protocol frames.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
