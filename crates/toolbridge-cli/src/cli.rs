//! CLI argument parsing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use toolbridge_client::AuthType;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "toolbridge",
    version,
    about = "Probe a remote MCP server and call its tools",
    long_about = "toolbridge talks to one MCP (Model Context Protocol) server over HTTP.\n\
                  Settings are read from a config file, then TOOLBRIDGE_* environment\n\
                  variables, then command-line flags; later sources win.\n\n\
                  Credentials passed as flags may end up in shell history. Prefer the\n\
                  config file or environment variables for secrets."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (TOML, YAML or JSON); defaults to <config dir>/toolbridge/config.*
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the server answers and lists its tools
    Probe,

    /// Tool operations
    #[command(subcommand)]
    Tools(ToolCommands),
}

/// Tool-related commands
#[derive(Subcommand, Debug)]
pub enum ToolCommands {
    /// List available tools
    List,

    /// Show normalized parameter schemas
    Schema {
        /// Tool name (omit to show all schemas)
        name: Option<String>,
    },

    /// Call a tool
    Call {
        /// Tool name
        name: String,

        /// Arguments as JSON object
        #[arg(long, short = 'a', default_value = "{}")]
        arguments: String,
    },
}

/// Connection overrides; each one replaces the configured value
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// MCP server URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Authentication type (none, api_key, bearer, basic)
    #[arg(long, global = true)]
    pub auth_type: Option<AuthType>,

    /// Bearer token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API key
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Header carrying the API key (default X-API-Key)
    #[arg(long, global = true)]
    pub api_key_header: Option<String>,

    /// Basic auth user name
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Request timeout in seconds (1-300)
    #[arg(long, global = true)]
    pub timeout: Option<u32>,
}

/// Output formats
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// Table
    Table,
    /// Pretty JSON
    Json,
    /// YAML
    Yaml,
}
