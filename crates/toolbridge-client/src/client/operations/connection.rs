//! Session handshake and connection probing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use toolbridge_protocol::types::methods;
use toolbridge_protocol::{Error, ErrorKind, InitializeParams};

use crate::client::core::McpToolClient;

/// Tool names listed in a successful [`ConnectionReport`].
pub const REPORTED_TOOL_NAMES: usize = 5;

/// Outcome of [`McpToolClient::ensure_session`].
#[derive(Debug, Clone)]
pub enum SessionStatus {
    /// A live cached session was adopted; no request was sent.
    Cached {
        /// The adopted session id
        session_id: String,
    },
    /// The `initialize` handshake succeeded.
    Initialized {
        /// The `initialize` result
        result: Value,
        /// Session id the server assigned, if any
        session_id: Option<String>,
    },
    /// The handshake failed. Callers may still proceed without a session.
    Fallback {
        /// Why the handshake failed
        error: Error,
    },
}

impl SessionStatus {
    /// Whether the session came from the cache.
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached { .. })
    }

    /// Whether the handshake failed.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The session id in effect after this step.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Cached { session_id } => Some(session_id),
            Self::Initialized { session_id, .. } => session_id.as_deref(),
            Self::Fallback { .. } => None,
        }
    }
}

/// Result of [`McpToolClient::test_connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    /// Whether the server was reachable and listed its tools
    pub success: bool,
    /// User-facing summary; never carries upstream error detail
    pub message: String,
    /// Number of tools discovered
    pub tools_count: usize,
    /// Session id in use after the probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// First few tool names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Failure classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl ConnectionReport {
    fn failure(err: &Error) -> Self {
        let kind = err.kind();
        Self {
            success: false,
            message: sanitized_message(err).to_string(),
            tools_count: 0,
            session_id: None,
            tools: Vec::new(),
            error_kind: Some(kind),
        }
    }
}

fn sanitized_message(err: &Error) -> &'static str {
    match err.kind() {
        ErrorKind::Configuration => "Connection failed: the server configuration is invalid.",
        ErrorKind::Transport => match err.http_status_code() {
            Some(401 | 403) => "Connection failed: the server rejected the credentials.",
            Some(_) => "Connection failed: the server answered with an HTTP error.",
            None => "Connection failed: the server could not be reached.",
        },
        ErrorKind::Protocol => "Connection failed: the server response could not be decoded.",
        ErrorKind::Server => "Connection failed: the server reported an error.",
        ErrorKind::SessionRecoveryExhausted => {
            "Connection failed: the server kept rejecting the session."
        }
    }
}

impl McpToolClient {
    /// Make sure a protocol session is in place.
    ///
    /// A live cached session for this server and credential is adopted
    /// without any network traffic. Otherwise the `initialize` handshake is
    /// sent, followed by `notifications/initialized`. A failed handshake does
    /// not raise; it yields [`SessionStatus::Fallback`] and the first real
    /// request decides whether the server can be used without a session.
    pub async fn ensure_session(&self) -> SessionStatus {
        if let Some(session_id) = self.cache.get(&self.cache_key) {
            info!(url = %self.config.endpoint(), "Reusing cached MCP session");
            self.set_session_id(session_id.clone());
            return SessionStatus::Cached { session_id };
        }

        let params = match serde_json::to_value(InitializeParams::new(self.client_info.clone())) {
            Ok(params) => params,
            Err(e) => return SessionStatus::Fallback { error: e.into() },
        };

        match self.send_once(methods::INITIALIZE, Some(params)).await {
            Ok(result) => {
                if let Err(e) = self.send_once(methods::INITIALIZED, None).await {
                    debug!(error = %e, "initialized notification failed, ignoring");
                }
                let session_id = self.session_id();
                info!(
                    url = %self.config.endpoint(),
                    session_assigned = session_id.is_some(),
                    "MCP session initialized"
                );
                SessionStatus::Initialized { result, session_id }
            }
            Err(error) => {
                warn!(
                    url = %self.config.endpoint(),
                    auth_type = %self.config.auth_type,
                    error = %error,
                    "MCP handshake failed, continuing without a session"
                );
                SessionStatus::Fallback { error }
            }
        }
    }

    /// Probe the server: reset the in-memory session, ensure a session and
    /// list tools. Never fails; problems are reported in the returned value
    /// with a sanitized message while the detail goes to the log.
    pub async fn test_connection(&self) -> ConnectionReport {
        self.clear_session();

        if let SessionStatus::Fallback { error: err } = self.ensure_session().await {
            error!(url = %self.config.endpoint(), error = %err, "MCP connection test failed during handshake");
            return ConnectionReport::failure(&err);
        }

        match self.discover_tools().await {
            Ok(tools) => {
                let tools_count = tools.len();
                ConnectionReport {
                    success: true,
                    message: format!(
                        "Successfully connected to MCP server. Found {tools_count} tools."
                    ),
                    tools_count,
                    session_id: self.session_id(),
                    tools: tools
                        .into_iter()
                        .take(REPORTED_TOOL_NAMES)
                        .map(|tool| tool.name)
                        .collect(),
                    error_kind: None,
                }
            }
            Err(err) => {
                error!(url = %self.config.endpoint(), error = %err, "MCP connection test failed");
                ConnectionReport::failure(&err)
            }
        }
    }
}
