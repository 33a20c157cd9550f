//! Command execution using toolbridge-client

use serde_json::{Map, Value};
use toolbridge_client::McpToolClient;

use crate::cli::{Commands, OutputFormat, ToolCommands};
use crate::error::{CliError, CliResult};
use crate::formatter::Formatter;

/// Execute CLI commands against one configured server
#[derive(Debug)]
pub struct CommandExecutor {
    pub formatter: Formatter,
    client: McpToolClient,
}

impl CommandExecutor {
    #[must_use]
    pub fn new(client: McpToolClient, format: OutputFormat, colored: bool) -> Self {
        Self {
            formatter: Formatter::new(format, colored),
            client,
        }
    }

    /// Execute a command
    pub async fn execute(&self, command: Commands) -> CliResult<()> {
        match command {
            Commands::Probe => self.execute_probe().await,
            Commands::Tools(cmd) => self.execute_tool_command(cmd).await,
        }
    }

    async fn execute_probe(&self) -> CliResult<()> {
        let report = self.client.test_connection().await;
        self.formatter.display_report(&report)?;
        if report.success {
            Ok(())
        } else {
            Err(CliError::ProbeFailed(report.message))
        }
    }

    async fn execute_tool_command(&self, command: ToolCommands) -> CliResult<()> {
        match command {
            ToolCommands::List => {
                let tools = self.client.discover_tools().await?;
                self.formatter.display_tools(&tools)
            }

            ToolCommands::Schema { name } => {
                let mut tools = self.client.discover_tools().await?;
                if let Some(name) = name {
                    tools.retain(|tool| tool.name == name);
                    if tools.is_empty() {
                        return Err(CliError::ToolNotFound(name));
                    }
                }
                self.formatter.display_schemas(&tools)
            }

            ToolCommands::Call { name, arguments } => {
                let args = parse_arguments(&arguments)?;
                let result = self.client.execute_action(&name, args).await?;
                self.formatter.display(&result)
            }
        }
    }
}

/// Parse `--arguments`; blank input means no arguments.
pub fn parse_arguments(raw: &str) -> CliResult<Map<String, Value>> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::InvalidArguments(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(CliError::InvalidArguments(format!(
            "Invalid JSON arguments: {e}"
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
