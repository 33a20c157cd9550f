//! Error types for CLI operations

use thiserror::Error;
use toolbridge_client::ErrorKind;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Failure reported by the MCP client
    #[error(transparent)]
    Client(#[from] toolbridge_client::Error),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The named tool is not offered by the server
    #[error("Tool '{0}' not found on the server")]
    ToolNotFound(String),

    /// The connection probe reported a failure
    #[error("{0}")]
    ProbeFailed(String),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML output error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration loading error
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl CliError {
    /// User-facing hints for resolving the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Client(err) => match err.kind() {
                ErrorKind::Configuration => vec![
                    "Set the server URL with --url or TOOLBRIDGE_SERVER_URL",
                    "Timeouts must be between 1 and 300 seconds",
                ],
                ErrorKind::Transport if matches!(err.http_status_code(), Some(401 | 403)) => vec![
                    "Check --auth-type and the matching credential flags",
                ],
                ErrorKind::Transport => vec![
                    "Check if the server is running",
                    "Verify the server URL",
                ],
                ErrorKind::SessionRecoveryExhausted => {
                    vec!["The server rejected a fresh session; verify the credentials"]
                }
                _ => vec![],
            },
            Self::ProbeFailed(_) => vec!["Re-run with -v to see the underlying error"],
            Self::InvalidArguments(_) => vec![
                "Arguments must be a JSON object, e.g. --arguments '{\"q\": \"hello\"}'",
            ],
            Self::ToolNotFound(_) => vec!["Run 'toolbridge tools list' to see available tools"],
            Self::Config(_) => vec!["Check the config file syntax and field names"],
            _ => vec![],
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge_client::Error;

    #[test]
    fn test_client_error_message_is_transparent() {
        let err = CliError::from(Error::action("search", Error::server("boom")));
        assert_eq!(
            err.to_string(),
            "Failed to execute action 'search': Server error: boom"
        );
    }

    #[test]
    fn test_auth_failures_suggest_credentials() {
        let err = CliError::from(Error::http_status(401, "HTTP 401 Unauthorized"));
        assert!(err.suggestions()[0].contains("--auth-type"));
    }

    #[test]
    fn test_user_errors() {
        let err = CliError::ToolNotFound("nope".into());
        assert_eq!(err.to_string(), "Tool 'nope' not found on the server");
        assert!(!err.suggestions().is_empty());
    }
}
