//! Output formatting for the CLI

use comfy_table::{Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{Map, Value};
use toolbridge_client::{ConnectionReport, ToolDescriptor};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Format and display output based on format preference
#[derive(Debug)]
pub struct Formatter {
    format: OutputFormat,
    colored: bool,
}

impl Formatter {
    #[must_use]
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    /// Display any serializable value
    pub fn display<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<String> {
        match self.format {
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human | OutputFormat::Table | OutputFormat::Json => {
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    /// Display the tools list
    pub fn display_tools(&self, tools: &[ToolDescriptor]) -> CliResult<()> {
        match self.format {
            OutputFormat::Human => {
                if tools.is_empty() {
                    self.print_info("No tools available");
                    return Ok(());
                }

                self.print_header("Available Tools");
                for tool in tools {
                    self.print_tool(tool);
                }
                self.print_footer(&format!("Total: {} tools", tools.len()));
                Ok(())
            }
            OutputFormat::Table => {
                println!("{}", tools_table(tools));
                Ok(())
            }
            _ => self.display(tools),
        }
    }

    /// Display normalized parameter schemas, keyed by tool name
    pub fn display_schemas(&self, tools: &[ToolDescriptor]) -> CliResult<()> {
        let schemas: Map<String, Value> = tools
            .iter()
            .map(|tool| (tool.name.clone(), tool.parameters.to_value()))
            .collect();

        match self.format {
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .apply_modifier(UTF8_ROUND_CORNERS)
                    .set_header(vec!["Tool", "Parameter", "Type", "Required"]);

                for tool in tools {
                    for (name, property) in &tool.parameters.properties {
                        let required = tool.parameters.required.iter().any(|r| r == name);
                        table.add_row(vec![
                            tool.name.as_str(),
                            name.as_str(),
                            property.get("type").and_then(Value::as_str).unwrap_or("-"),
                            if required { "yes" } else { "no" },
                        ]);
                    }
                }

                println!("{table}");
                Ok(())
            }
            _ => self.display(&schemas),
        }
    }

    /// Display a connection probe report
    pub fn display_report(&self, report: &ConnectionReport) -> CliResult<()> {
        match self.format {
            OutputFormat::Human | OutputFormat::Table => {
                if report.success {
                    self.print_success(&report.message);
                } else {
                    self.print_failure(&report.message);
                }
                if let Some(session_id) = &report.session_id {
                    self.print_kv("Session", session_id);
                }
                if let Some(kind) = report.error_kind {
                    self.print_kv("Error kind", kind.as_str());
                }
                if !report.tools.is_empty() {
                    self.print_kv("Tools", &report.tools.join(", "));
                }
                Ok(())
            }
            _ => self.display(report),
        }
    }

    /// Display an error with suggestions on stderr
    pub fn display_error(&self, error: &CliError) {
        eprint!("{}", self.render_error(error));
    }

    fn render_error(&self, error: &CliError) -> String {
        let mut out = if self.colored {
            format!("{}: {}\n", "Error".bright_red().bold(), error)
        } else {
            format!("Error: {error}\n")
        };

        let suggestions = error.suggestions();
        if suggestions.is_empty() {
            return out;
        }
        if self.colored {
            out.push_str(&format!("\n{}\n", "Suggestions:".bright_yellow().bold()));
            for suggestion in suggestions {
                out.push_str(&format!("  {} {}\n", "•".bright_blue(), suggestion));
            }
        } else {
            out.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                out.push_str(&format!("  • {suggestion}\n"));
            }
        }
        out
    }

    fn print_header(&self, text: &str) {
        if self.colored {
            println!("\n{}", text.bright_cyan().bold());
            println!("{}", "=".repeat(text.len()).bright_cyan());
        } else {
            println!("\n{text}");
            println!("{}", "=".repeat(text.len()));
        }
    }

    fn print_footer(&self, text: &str) {
        if self.colored {
            println!("\n{}", text.bright_black());
        } else {
            println!("\n{text}");
        }
    }

    fn print_info(&self, text: &str) {
        if self.colored {
            println!("{}", text.bright_blue());
        } else {
            println!("{text}");
        }
    }

    fn print_success(&self, text: &str) {
        if self.colored {
            println!("{} {}", "✓".bright_green().bold(), text);
        } else {
            println!("OK: {text}");
        }
    }

    fn print_failure(&self, text: &str) {
        if self.colored {
            println!("{} {}", "✗".bright_red().bold(), text);
        } else {
            println!("FAILED: {text}");
        }
    }

    fn print_kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("  {}: {}", key.bright_green().bold(), value);
        } else {
            println!("  {key}: {value}");
        }
    }

    fn print_tool(&self, tool: &ToolDescriptor) {
        if self.colored {
            println!("  {} {}", "•".bright_blue(), tool.name.bright_green().bold());
        } else {
            println!("  • {}", tool.name);
        }
        if !tool.description.is_empty() {
            println!("    {}", tool.description);
        }
        let params = parameter_summary(tool);
        if params != "-" {
            println!("    Parameters: {params}");
        }
    }
}

fn tools_table(tools: &[ToolDescriptor]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Name", "Description", "Parameters"]);

    for tool in tools {
        let description = if tool.description.is_empty() {
            "-"
        } else {
            tool.description.as_str()
        };
        table.add_row(vec![
            tool.name.clone(),
            description.to_string(),
            parameter_summary(tool),
        ]);
    }
    table
}

/// Parameter names, required ones marked with `*`
fn parameter_summary(tool: &ToolDescriptor) -> String {
    let schema = &tool.parameters;
    if schema.properties.is_empty() {
        return "-".to_string();
    }
    schema
        .properties
        .keys()
        .map(|name| {
            if schema.required.contains(name) {
                format!("{name}*")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
