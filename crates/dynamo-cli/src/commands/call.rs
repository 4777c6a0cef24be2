//! `dynamo-mcp-server call` - run a single tool call and print the envelope.

use super::GatewayArgs;
use anyhow::{Context, Result};
use dynamo_mcp::{Dispatcher, SdkBackend};
use serde_json::Value;
use std::sync::Arc;

pub async fn run(args: GatewayArgs, tool: &str, arguments: Option<&str>) -> Result<()> {
    let arguments: Value = match arguments {
        Some(text) => serde_json::from_str(text).context("--args must be valid JSON")?,
        None => Value::Object(Default::default()),
    };

    let config = args.load()?;
    let backend = SdkBackend::from_config(&config.aws).await;
    let dispatcher = Dispatcher::with_catalog(Arc::new(backend));

    let envelope = dispatcher.dispatch(tool, &arguments).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
