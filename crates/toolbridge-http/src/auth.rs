//! Outbound request authentication.
//!
//! | auth type | effect                                                        |
//! |-----------|---------------------------------------------------------------|
//! | `api_key` | `<api_key_header, default X-API-Key>: <api_key>`              |
//! | `bearer`  | `Authorization: Bearer <bearer_token>`                        |
//! | `basic`   | HTTP basic auth with `username` / `password`                  |
//! | `none`    | nothing                                                       |
//!
//! Missing credentials for a declared type leave requests unauthenticated;
//! nothing is rejected up front.

use std::collections::HashMap;
use std::fmt;

use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Header used for `api_key` auth when the credentials do not name one.
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Declared authentication scheme of a server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// API key in a request header
    ApiKey,
    /// Bearer token in `Authorization`
    Bearer,
    /// HTTP basic auth
    Basic,
}

impl AuthType {
    /// Wire/config name of this auth type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApiKey => "api_key",
            Self::Bearer => "bearer",
            Self::Basic => "basic",
        }
    }

    /// All accepted config names.
    pub fn variants() -> &'static [&'static str] {
        &["none", "api_key", "bearer", "basic"]
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "api_key" | "api-key" | "apikey" => Ok(Self::ApiKey),
            "bearer" => Ok(Self::Bearer),
            "basic" => Ok(Self::Basic),
            other => Err(format!(
                "unknown auth type '{other}', expected one of: {}",
                Self::variants().join(", ")
            )),
        }
    }
}

/// Authentication resolved from an auth type and a credentials mapping.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthBinding {
    /// Send requests unauthenticated
    #[default]
    None,
    /// Set a static header
    Header {
        /// Header name
        name: String,
        /// Header value (secret)
        value: String,
    },
    /// Transport-level basic auth
    Basic {
        /// User name
        username: String,
        /// Password (secret)
        password: String,
    },
}

impl fmt::Debug for AuthBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Header { name, .. } => f
                .debug_struct("Header")
                .field("name", name)
                .field("value", &"<redacted>")
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

fn non_empty<'a>(credentials: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    credentials
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

impl AuthBinding {
    /// Resolve the binding for `auth_type` from `credentials`.
    pub fn from_credentials(auth_type: AuthType, credentials: &HashMap<String, String>) -> Self {
        match auth_type {
            AuthType::None => Self::None,
            AuthType::ApiKey => match non_empty(credentials, "api_key") {
                Some(key) => Self::Header {
                    name: non_empty(credentials, "api_key_header")
                        .unwrap_or(DEFAULT_API_KEY_HEADER)
                        .to_string(),
                    value: key.to_string(),
                },
                None => Self::None,
            },
            AuthType::Bearer => match non_empty(credentials, "bearer_token") {
                Some(token) => Self::Header {
                    name: AUTHORIZATION.as_str().to_string(),
                    value: format!("Bearer {token}"),
                },
                None => Self::None,
            },
            AuthType::Basic => match (
                non_empty(credentials, "username"),
                non_empty(credentials, "password"),
            ) {
                (Some(username), Some(password)) => Self::Basic {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => Self::None,
            },
        }
    }

    /// Whether any authentication will be applied.
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Apply this binding to an outgoing request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => request,
            Self::Header { name, value } => {
                match (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    (Ok(name), Ok(mut value)) => {
                        value.set_sensitive(true);
                        request.header(name, value)
                    }
                    _ => {
                        warn!("Skipping auth header '{}': invalid header name or value", name);
                        request
                    }
                }
            }
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_api_key_default_header() {
        let binding = AuthBinding::from_credentials(AuthType::ApiKey, &creds(&[("api_key", "k1")]));
        assert_eq!(
            binding,
            AuthBinding::Header {
                name: "X-API-Key".into(),
                value: "k1".into()
            }
        );
    }

    #[test]
    fn test_api_key_custom_header() {
        let binding = AuthBinding::from_credentials(
            AuthType::ApiKey,
            &creds(&[("api_key", "k1"), ("api_key_header", "X-Custom")]),
        );
        assert_eq!(
            binding,
            AuthBinding::Header {
                name: "X-Custom".into(),
                value: "k1".into()
            }
        );
    }

    #[test]
    fn test_bearer() {
        let binding =
            AuthBinding::from_credentials(AuthType::Bearer, &creds(&[("bearer_token", "tok")]));
        assert_eq!(
            binding,
            AuthBinding::Header {
                name: "authorization".into(),
                value: "Bearer tok".into()
            }
        );
    }

    #[test]
    fn test_basic_requires_both_fields() {
        let binding = AuthBinding::from_credentials(AuthType::Basic, &creds(&[("username", "u")]));
        assert_eq!(binding, AuthBinding::None);

        let binding = AuthBinding::from_credentials(
            AuthType::Basic,
            &creds(&[("username", "u"), ("password", "p")]),
        );
        assert!(binding.is_configured());
    }

    #[test]
    fn test_missing_credentials_fall_back_to_unauthenticated() {
        assert_eq!(
            AuthBinding::from_credentials(AuthType::Bearer, &HashMap::new()),
            AuthBinding::None
        );
        assert_eq!(
            AuthBinding::from_credentials(AuthType::ApiKey, &creds(&[("api_key", "")])),
            AuthBinding::None
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let binding = AuthBinding::from_credentials(
            AuthType::Basic,
            &creds(&[("username", "alice"), ("password", "hunter2")]),
        );
        let debug = format!("{binding:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_type_parse_and_serde() {
        assert_eq!("api_key".parse::<AuthType>().unwrap(), AuthType::ApiKey);
        assert_eq!("BEARER".parse::<AuthType>().unwrap(), AuthType::Bearer);
        assert!("oauth".parse::<AuthType>().is_err());
        assert_eq!(serde_json::to_string(&AuthType::ApiKey).unwrap(), "\"api_key\"");
    }
}
