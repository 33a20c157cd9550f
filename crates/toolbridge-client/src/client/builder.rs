//! Builder for [`McpToolClient`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use toolbridge_http::{HttpTransport, HttpTransportConfig};
use toolbridge_protocol::{ClientInfo, Result};

use super::core::McpToolClient;
use crate::config::ServerConfig;
use crate::session::SessionCache;

/// Fluent configuration of a [`McpToolClient`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use toolbridge_client::{McpToolClient, ServerConfig, SessionCache};
///
/// # fn example() -> toolbridge_protocol::Result<()> {
/// let client = McpToolClient::builder(ServerConfig::new("http://localhost:8080/mcp"))
///     .session_cache(Arc::new(SessionCache::new()))
///     .client_info("my-agent", "1.2.0")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct McpToolClientBuilder {
    config: ServerConfig,
    cache: Option<Arc<SessionCache>>,
    client_info: ClientInfo,
    user_agent: Option<String>,
    headers: HashMap<String, String>,
}

impl McpToolClientBuilder {
    /// Create a builder with default settings.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            cache: None,
            client_info: ClientInfo::default(),
            user_agent: HttpTransportConfig::default().user_agent,
            headers: HashMap::new(),
        }
    }

    /// Use a specific session cache instead of the process-wide one.
    #[must_use]
    pub fn session_cache(mut self, cache: Arc<SessionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Identity sent in the `initialize` handshake.
    #[must_use]
    pub fn client_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_info = ClientInfo {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](toolbridge_protocol::Error::Configuration)
    /// for an invalid config or an HTTP client that cannot be built.
    pub fn build(self) -> Result<McpToolClient> {
        self.config.validate()?;

        let transport = HttpTransport::new(HttpTransportConfig {
            endpoint: self.config.endpoint().to_string(),
            timeout: self.config.timeout_duration(),
            auth: self.config.auth_binding(),
            headers: self.headers,
            user_agent: self.user_agent,
        })?;

        debug!(
            url = %self.config.endpoint(),
            auth_type = %self.config.auth_type,
            timeout_secs = self.config.timeout,
            "Created MCP tool client"
        );

        let cache = self.cache.unwrap_or_else(SessionCache::global);
        Ok(McpToolClient::from_parts(
            self.config,
            cache,
            transport,
            self.client_info,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge_protocol::ErrorKind;

    #[test]
    fn test_build_rejects_invalid_config() {
        let err = McpToolClient::builder(ServerConfig::new("localhost"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_build_uses_injected_cache() {
        let cache = Arc::new(SessionCache::new());
        let client = McpToolClient::builder(ServerConfig::new("http://localhost:8080/mcp/"))
            .session_cache(cache.clone())
            .client_info("agent", "9.9.9")
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(client.session_cache(), &cache));
        assert_eq!(client.client_info().name, "agent");
        assert_eq!(client.cache_key(), "http://localhost:8080/mcp|none");
        assert!(client.session_id().is_none());
    }
}
