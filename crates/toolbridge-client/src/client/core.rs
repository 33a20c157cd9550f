//! Core `McpToolClient` state and the request executor.
//!
//! Every request goes through [`McpToolClient::execute`], which sends the
//! envelope, records any session id the server announces, and recovers once
//! from a lost session by re-running the handshake.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use toolbridge_http::HttpTransport;
use toolbridge_protocol::{
    ClientInfo, Error, Result, RpcRequest, decode_response, is_notification,
};

use super::builder::McpToolClientBuilder;
use crate::config::{ConfigField, ServerConfig};
use crate::recovery::is_session_loss;
use crate::session::SessionCache;

/// Sends per logical request: the first attempt plus one retry after recovery.
pub const MAX_ATTEMPTS: u32 = 2;

/// Client for one remote MCP server.
///
/// Cheap to share behind an `Arc`; all operations take `&self`. The protocol
/// session id lives in memory per instance and is mirrored into a
/// [`SessionCache`] shared with other instances for the same server and
/// credential.
///
/// # Examples
///
/// ```rust,no_run
/// use toolbridge_client::{McpToolClient, ServerConfig};
///
/// # async fn example() -> toolbridge_protocol::Result<()> {
/// let client = McpToolClient::new(ServerConfig::bearer(
///     "https://mcp.example.com/mcp",
///     "my-token",
/// ))?;
///
/// for tool in client.discover_tools().await? {
///     println!("{}: {}", tool.name, tool.description);
/// }
/// # Ok(())
/// # }
/// ```
pub struct McpToolClient {
    pub(super) config: ServerConfig,
    pub(super) cache_key: String,
    pub(super) cache: Arc<SessionCache>,
    pub(super) transport: HttpTransport,
    pub(super) client_info: ClientInfo,
    session_id: RwLock<Option<String>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for McpToolClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpToolClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("client_info", &self.client_info)
            .field("has_session", &self.session_id.read().is_some())
            .finish()
    }
}

impl McpToolClient {
    /// Create a client using the process-wide session cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the config fails validation.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building a client.
    pub fn builder(config: ServerConfig) -> McpToolClientBuilder {
        McpToolClientBuilder::new(config)
    }

    /// Configuration fields a host must collect to build a client.
    pub fn config_requirements() -> Vec<ConfigField> {
        crate::config::config_requirements()
    }

    pub(super) fn from_parts(
        config: ServerConfig,
        cache: Arc<SessionCache>,
        transport: HttpTransport,
        client_info: ClientInfo,
    ) -> Self {
        let cache_key = config.cache_key();
        Self {
            config,
            cache_key,
            cache,
            transport,
            client_info,
            session_id: RwLock::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Key under which this client's session is cached.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// The session cache this client reads and writes.
    pub fn session_cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    /// Identity reported in `initialize`.
    pub fn client_info(&self) -> &ClientInfo {
        &self.client_info
    }

    /// Current protocol session id, if any.
    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    pub(super) fn set_session_id(&self, session_id: String) {
        *self.session_id.write() = Some(session_id);
    }

    /// Forget the in-memory session id. The shared cache is left untouched.
    pub fn clear_session(&self) {
        *self.session_id.write() = None;
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send one request, recovering once from a lost session.
    ///
    /// A transport failure that looks like session loss, seen while a session
    /// id is held, invalidates the cached session, re-runs the handshake and
    /// reissues the request. A second session-loss failure becomes
    /// [`Error::SessionRecoveryExhausted`]. Without a session id there is
    /// nothing to recover and the failure is returned as is.
    ///
    /// Notifications resolve to an empty object without reading the body.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol or server errors from the final attempt.
    pub async fn execute(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let mut attempt = 1;
        loop {
            let err = match self.send_once(method, params.clone()).await {
                Ok(result) => return Ok(result),
                Err(err) => err,
            };

            if !is_session_loss(&err) {
                return Err(err);
            }
            if attempt >= MAX_ATTEMPTS {
                return Err(Error::SessionRecoveryExhausted(err.to_string()));
            }
            if self.session_id().is_none() {
                return Err(err);
            }

            warn!(
                method,
                url = %self.config.endpoint(),
                auth_type = %self.config.auth_type,
                "Session rejected by server, re-initializing and retrying once"
            );
            self.cache.invalidate(&self.cache_key);
            self.clear_session();
            self.ensure_session().await;
            attempt += 1;
        }
    }

    /// Single POST without recovery: send, record the session id, check the
    /// status, decode.
    pub(super) async fn send_once(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let notification = is_notification(method);
        let id = (!notification).then(|| self.next_request_id());
        let request = RpcRequest::new(method, id, params);

        let current = self.session_id();
        let reply = self.transport.post(&request, current.as_deref()).await?;

        if let Some(session_id) = reply.session_id() {
            if current.as_deref() != Some(session_id) {
                debug!(method, "Server assigned protocol session");
            }
            self.set_session_id(session_id.to_string());
            self.cache.put(self.cache_key.clone(), session_id);
        }

        let reply = reply.error_for_status().await?;

        if notification {
            return Ok(Value::Object(Map::new()));
        }

        let body = reply.text().await?;
        decode_response(&body)
    }
}
