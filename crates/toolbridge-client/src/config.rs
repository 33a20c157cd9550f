//! Server configuration.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use toolbridge_http::{AuthBinding, AuthType};
use toolbridge_protocol::{Error, Result};

use crate::credentials::CredentialStore;
use crate::session::derive_cache_key;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Smallest accepted timeout in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Largest accepted timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings for one remote MCP server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server address the envelopes are posted to
    pub server_url: String,

    /// Declared authentication scheme
    #[serde(default)]
    pub auth_type: AuthType,

    /// Credentials for `auth_type`; shape depends on the type
    #[serde(default)]
    pub auth_credentials: HashMap<String, String>,

    /// Per-request timeout in seconds (1-300)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.auth_credentials.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ServerConfig")
            .field("server_url", &self.server_url)
            .field("auth_type", &self.auth_type)
            .field("auth_credentials", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServerConfig {
    /// Unauthenticated config with the default timeout.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            auth_type: AuthType::None,
            auth_credentials: HashMap::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the auth type.
    #[must_use]
    pub fn with_auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    /// Add one credential entry.
    #[must_use]
    pub fn with_credential(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_credentials.insert(key.into(), value.into());
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Bearer-token config, the common case.
    pub fn bearer(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(server_url)
            .with_auth_type(AuthType::Bearer)
            .with_credential("bearer_token", token)
    }

    /// Fill `auth_credentials` from an encrypted blob.
    ///
    /// # Errors
    ///
    /// Propagates the store's decryption failure.
    pub fn with_stored_credentials(
        mut self,
        store: &dyn CredentialStore,
        user_id: &str,
        blob: &[u8],
    ) -> Result<Self> {
        self.auth_credentials = store.decrypt(user_id, blob)?;
        Ok(self)
    }

    /// Check the address and timeout. Credentials are not checked: missing
    /// ones leave requests unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let address = self.server_url.trim();
        if address.is_empty() {
            return Err(Error::Configuration("server_url is required".to_string()));
        }

        let parsed = Url::parse(address).map_err(|e| {
            Error::Configuration(format!("server_url '{address}' is not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "server_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout) {
            return Err(Error::Configuration(format!(
                "timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds, got {}",
                self.timeout
            )));
        }

        Ok(())
    }

    /// The address envelopes are posted to, trailing `/` stripped.
    pub fn endpoint(&self) -> &str {
        self.server_url.trim().trim_end_matches('/')
    }

    /// Timeout as a [`Duration`].
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Resolve the request authentication.
    pub fn auth_binding(&self) -> AuthBinding {
        AuthBinding::from_credentials(self.auth_type, &self.auth_credentials)
    }

    /// Session-cache key for this server and credential.
    pub fn cache_key(&self) -> String {
        derive_cache_key(self.endpoint(), self.auth_type, &self.auth_credentials)
    }
}

/// One entry of the configuration surface, for settings UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigField {
    /// Field name
    pub name: &'static str,
    /// Value type (`string`, `select`, `object`, `integer`)
    #[serde(rename = "type")]
    pub field_type: &'static str,
    /// Whether a value must be supplied
    pub required: bool,
    /// Default value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description
    pub description: &'static str,
    /// Allowed values for `select` fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
}

/// Describe the fields a [`ServerConfig`] accepts.
pub fn config_requirements() -> Vec<ConfigField> {
    vec![
        ConfigField {
            name: "server_url",
            field_type: "string",
            required: true,
            default: None,
            description: "MCP server URL (e.g. https://mcp.example.com/mcp)",
            options: Vec::new(),
        },
        ConfigField {
            name: "auth_type",
            field_type: "select",
            required: true,
            default: Some(json!("none")),
            description: "Authentication type",
            options: AuthType::variants().to_vec(),
        },
        ConfigField {
            name: "auth_credentials",
            field_type: "object",
            required: false,
            default: Some(json!({})),
            description: "Credentials for the auth type: api_key and api_key_header, \
                          bearer_token, or username and password",
            options: Vec::new(),
        },
        ConfigField {
            name: "timeout",
            field_type: "integer",
            required: false,
            default: Some(json!(DEFAULT_TIMEOUT_SECS)),
            description: "Request timeout in seconds (1-300)",
            options: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_defaults() {
        let config: ServerConfig =
            serde_json::from_value(json!({"server_url": "https://mcp.example.com/mcp"})).unwrap();
        assert_eq!(config.auth_type, AuthType::None);
        assert!(config.auth_credentials.is_empty());
        assert_eq!(config.timeout, 30);
        config.validate().unwrap();
    }

    #[test]
    fn test_deserialize_full() {
        let config: ServerConfig = serde_json::from_value(json!({
            "server_url": "https://mcp.example.com/mcp/",
            "auth_type": "api_key",
            "auth_credentials": {"api_key": "k1", "api_key_header": "X-Custom"},
            "timeout": 5
        }))
        .unwrap();
        assert_eq!(config.auth_type, AuthType::ApiKey);
        assert_eq!(config.endpoint(), "https://mcp.example.com/mcp");
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert!(config.auth_binding().is_configured());
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        for url in ["", "   ", "not a url", "ftp://mcp.example.com"] {
            let err = ServerConfig::new(url).validate().unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{url}: {err}");
        }
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let base = ServerConfig::new("http://localhost:8080/mcp");
        assert!(base.clone().with_timeout(0).validate().is_err());
        assert!(base.clone().with_timeout(301).validate().is_err());
        base.clone().with_timeout(1).validate().unwrap();
        base.with_timeout(300).validate().unwrap();
    }

    #[test]
    fn test_missing_credentials_are_not_an_error() {
        let config = ServerConfig::new("http://localhost/mcp").with_auth_type(AuthType::Bearer);
        config.validate().unwrap();
        assert!(!config.auth_binding().is_configured());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ServerConfig::bearer("http://localhost/mcp", "tok123456789");
        let debug = format!("{config:?}");
        assert!(debug.contains("bearer_token"));
        assert!(!debug.contains("tok123"));
    }

    #[test]
    fn test_cache_key_ignores_trailing_slash() {
        let a = ServerConfig::bearer("http://h/mcp/", "tok123456789");
        let b = ServerConfig::bearer("http://h/mcp", "tok123456789");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "http://h/mcp|bearer:tok1234567");
    }

    struct FixedStore;

    impl CredentialStore for FixedStore {
        fn decrypt(&self, user_id: &str, blob: &[u8]) -> Result<HashMap<String, String>> {
            if blob.is_empty() {
                return Err(Error::Configuration(format!("no credentials for {user_id}")));
            }
            Ok(HashMap::from([(
                "bearer_token".to_string(),
                String::from_utf8_lossy(blob).into_owned(),
            )]))
        }
    }

    #[test]
    fn test_with_stored_credentials() {
        let config = ServerConfig::new("http://h/mcp")
            .with_auth_type(AuthType::Bearer)
            .with_stored_credentials(&FixedStore, "u1", b"tok")
            .unwrap();
        assert_eq!(config.auth_credentials["bearer_token"], "tok");

        let err = ServerConfig::new("http://h/mcp")
            .with_stored_credentials(&FixedStore, "u1", b"")
            .unwrap_err();
        assert!(err.to_string().contains("u1"));
    }

    #[test]
    fn test_config_requirements_surface() {
        let fields = config_requirements();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["server_url", "auth_type", "auth_credentials", "timeout"]
        );
        assert_eq!(fields[1].options, ["none", "api_key", "bearer", "basic"]);
        assert_eq!(fields[3].default, Some(json!(30)));

        let json = serde_json::to_value(&fields[0]).unwrap();
        assert_eq!(json["type"], "string");
        assert!(json.get("options").is_none());
    }
}
