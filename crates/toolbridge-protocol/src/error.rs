//! Error types shared by every toolbridge crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized `Result` type for toolbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents every failure a remote MCP tool call can run into.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The server configuration is malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure, timeout, or a non-2xx HTTP status.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable failure text, including status line and body excerpt when known
        message: String,
        /// HTTP status code when the server answered at all
        status: Option<u16>,
    },

    /// The response body could not be decoded.
    #[error("Protocol error: {message}")]
    Protocol {
        /// What went wrong while decoding
        message: String,
        /// The raw response text
        raw: String,
    },

    /// The decoded envelope carried an `error` member.
    #[error("Server error: {message}")]
    Server {
        /// The server's error message
        message: String,
    },

    /// A session-loss failure persisted after the single permitted retry.
    #[error("Session recovery exhausted: {0}")]
    SessionRecoveryExhausted(String),

    /// Tool discovery failed.
    #[error("Failed to discover tools from MCP server: {0}")]
    Discovery(Box<Error>),

    /// Invoking a named action failed.
    #[error("Failed to execute action '{name}': {source}")]
    Action {
        /// The action (tool) name
        name: String,
        /// The underlying failure
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`], stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`Error::Configuration`]
    Configuration,
    /// See [`Error::Transport`]
    Transport,
    /// See [`Error::Protocol`]
    Protocol,
    /// See [`Error::Server`]
    Server,
    /// See [`Error::SessionRecoveryExhausted`]
    SessionRecoveryExhausted,
}

impl ErrorKind {
    /// The `snake_case` name used in serialized reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Server => "server",
            Self::SessionRecoveryExhausted => "session_recovery_exhausted",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a transport error without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Create a transport error for an HTTP status the server answered with.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a protocol (decode) error carrying the raw response text.
    pub fn protocol(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Create a server-side error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Wrap a failure raised while discovering tools.
    pub fn discovery(source: Error) -> Self {
        Self::Discovery(Box::new(source))
    }

    /// Wrap a failure raised while executing the named action.
    pub fn action(name: impl Into<String>, source: Error) -> Self {
        Self::Action {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Classify this error; operation wrappers report their inner kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Server { .. } => ErrorKind::Server,
            Self::SessionRecoveryExhausted(_) => ErrorKind::SessionRecoveryExhausted,
            Self::Discovery(inner) => inner.kind(),
            Self::Action { source, .. } => source.kind(),
        }
    }

    /// The HTTP status behind a transport error, if any.
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Discovery(inner) => inner.http_status_code(),
            Self::Action { source, .. } => source.http_status_code(),
            _ => None,
        }
    }

    /// Whether this failure happened at the transport level.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::protocol(err.to_string(), String::new())
    }
}
