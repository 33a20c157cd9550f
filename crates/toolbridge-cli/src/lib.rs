//! # toolbridge CLI
//!
//! Operator tool for a single remote MCP server: probe the connection, list
//! the normalized tool catalog, inspect parameter schemas and call a tool.
//!
//! ## Usage
//!
//! ```bash
//! # Check connectivity
//! toolbridge probe --url http://localhost:8080/mcp
//!
//! # List tools as a table
//! toolbridge tools list --url http://localhost:8080/mcp --format table
//!
//! # Call a tool with a bearer token taken from the environment
//! TOOLBRIDGE_AUTH_TYPE=bearer TOOLBRIDGE_AUTH_CREDENTIALS__BEARER_TOKEN=... \
//!   toolbridge tools call search --arguments '{"q": "hello"}' --url http://localhost:8080/mcp
//! ```

pub mod cli;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod settings;

use std::io::IsTerminal;

use clap::Parser;
use toolbridge_client::McpToolClient;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands, OutputFormat, ToolCommands};
pub use error::{CliError, CliResult};
pub use executor::CommandExecutor;
pub use formatter::Formatter;

/// Install the stderr log subscriber; `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application. Errors are displayed before being returned.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let colored = !cli.no_color && std::io::stdout().is_terminal();
    let result = execute(cli, colored).await;

    if let Err(e) = &result {
        let colored_err = colored && std::io::stderr().is_terminal();
        Formatter::new(OutputFormat::Human, colored_err).display_error(e);
    }
    result
}

async fn execute(cli: Cli, colored: bool) -> CliResult<()> {
    let config = settings::load(cli.config.as_deref(), &cli.connection)?;
    let client = McpToolClient::new(config)?;
    let executor = CommandExecutor::new(client, cli.format, colored);
    executor.execute(cli.command).await
}
