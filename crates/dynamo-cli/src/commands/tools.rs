//! `dynamo-mcp-server tools` - print the tool catalog (offline).

use anyhow::Result;
use dynamo_mcp::ToolRegistry;

/// Print every tool, or the full `tools/list` payload with `verbose`.
pub fn list(verbose: bool) -> Result<()> {
    let definitions = ToolRegistry::catalog().definitions();

    if verbose {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    println!("\n🔧 Available Tools ({}):\n", definitions.len());
    for tool in &definitions {
        let read_only = tool
            .annotations
            .as_ref()
            .is_some_and(|a| a.read_only_hint == Some(true));
        let badge = if read_only { "read" } else { "write" };
        println!("  {:<16} [{}]", tool.name, badge);
        if let Some(description) = &tool.description {
            println!("      {}", description);
        }
    }
    println!();

    Ok(())
}
