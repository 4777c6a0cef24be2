use clap::{Parser, Subcommand};

mod commands;

use commands::GatewayArgs;

#[derive(Parser, Debug)]
#[command(name = "dynamo-mcp-server", version, about = "MCP tool gateway for Amazon DynamoDB")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdin/stdout.
    Serve {
        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// List the tools the server exposes.
    Tools {
        /// Print full definitions, including input schemas, as JSON
        #[arg(long, short, default_value_t = false)]
        verbose: bool,
    },

    /// Execute one tool call against DynamoDB and print the result.
    Call {
        /// Tool name, e.g. describe_table
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long = "args")]
        arguments: Option<String>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve { gateway } => commands::serve::run(gateway).await?,
        Command::Tools { verbose } => commands::tools::list(verbose)?,
        Command::Call {
            tool,
            arguments,
            gateway,
        } => commands::call::run(gateway, &tool, arguments.as_deref()).await?,
    }

    Ok(())
}
