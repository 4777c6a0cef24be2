//! `dynamo-mcp-server serve` - run the MCP server over stdio.

use super::GatewayArgs;
use anyhow::{Context, Result};
use dynamo_mcp::{Dispatcher, McpServer, SdkBackend};
use std::sync::Arc;
use tracing::info;

pub async fn run(args: GatewayArgs) -> Result<()> {
    let config = args.load()?;

    info!(
        region = config.aws.region.as_deref().unwrap_or("<default chain>"),
        custom_endpoint = config.aws.has_custom_endpoint(),
        "Connecting to DynamoDB"
    );
    let backend = SdkBackend::from_config(&config.aws).await;
    let dispatcher = Dispatcher::with_catalog(Arc::new(backend));
    let server = McpServer::new(config.server, dispatcher);

    tokio::select! {
        result = server.run_stdio() => result.context("MCP server failed")?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    Ok(())
}
