//! Cache key derivation.
//!
//! A key identifies "this server with this authentication". It is built from
//! the server address and a short, type-tagged fingerprint of the credential,
//! never the full secret:
//!
//! | auth type | fingerprint                          |
//! |-----------|--------------------------------------|
//! | `none`    | `none`                               |
//! | `api_key` | `api_key:<first 10 chars of key>`    |
//! | `bearer`  | `bearer:<first 10 chars of token>`   |
//! | `basic`   | `basic:<username>`                   |
//!
//! A missing secret fingerprints as `none` after the tag. Basic auth keys on
//! the username alone, so two configs differing only in password share a key.

use std::collections::HashMap;

use toolbridge_http::AuthType;

/// Characters of a secret kept in the fingerprint.
pub const FINGERPRINT_LEN: usize = 10;

const ABSENT: &str = "none";

fn credential<'a>(credentials: &'a HashMap<String, String>, key: &str) -> &'a str {
    credentials
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(ABSENT)
}

fn truncated(secret: &str) -> String {
    secret.chars().take(FINGERPRINT_LEN).collect()
}

/// Fingerprint of the credential that identifies an authenticated session.
pub fn auth_fingerprint(auth_type: AuthType, credentials: &HashMap<String, String>) -> String {
    match auth_type {
        AuthType::None => ABSENT.to_string(),
        AuthType::ApiKey => format!("api_key:{}", truncated(credential(credentials, "api_key"))),
        AuthType::Bearer => format!(
            "bearer:{}",
            truncated(credential(credentials, "bearer_token"))
        ),
        AuthType::Basic => format!("basic:{}", credential(credentials, "username")),
    }
}

/// Derive the session-cache key for a server address and its authentication.
pub fn derive_cache_key(
    server_url: &str,
    auth_type: AuthType,
    credentials: &HashMap<String, String>,
) -> String {
    format!(
        "{}|{}",
        server_url.trim_end_matches('/'),
        auth_fingerprint(auth_type, credentials)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn creds(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bearer_fingerprint_is_truncated() {
        let key = derive_cache_key(
            "https://mcp.example.com/mcp",
            AuthType::Bearer,
            &creds(&[("bearer_token", "tok123456789")]),
        );
        assert_eq!(key, "https://mcp.example.com/mcp|bearer:tok1234567");
        assert!(!key.contains("tok123456789"));
    }

    #[test]
    fn test_api_key_fingerprint() {
        assert_eq!(
            auth_fingerprint(AuthType::ApiKey, &creds(&[("api_key", "abc")])),
            "api_key:abc"
        );
        assert_eq!(auth_fingerprint(AuthType::ApiKey, &creds(&[])), "api_key:none");
    }

    #[test]
    fn test_basic_uses_username_only() {
        let a = derive_cache_key(
            "http://h/mcp",
            AuthType::Basic,
            &creds(&[("username", "alice"), ("password", "one")]),
        );
        let b = derive_cache_key(
            "http://h/mcp",
            AuthType::Basic,
            &creds(&[("username", "alice"), ("password", "two")]),
        );
        assert_eq!(a, b);
        assert_eq!(a, "http://h/mcp|basic:alice");
    }

    #[test]
    fn test_identical_inputs_identical_keys() {
        let c = creds(&[("bearer_token", "tokenAAAAAAAAAAA")]);
        assert_eq!(
            derive_cache_key("http://h/mcp/", AuthType::Bearer, &c),
            derive_cache_key("http://h/mcp", AuthType::Bearer, &c)
        );
    }

    #[test]
    fn test_different_auth_different_keys() {
        let url = "http://h/mcp";
        let none = derive_cache_key(url, AuthType::None, &creds(&[]));
        let bearer = derive_cache_key(url, AuthType::Bearer, &creds(&[("bearer_token", "x")]));
        let other = derive_cache_key(url, AuthType::Bearer, &creds(&[("bearer_token", "y")]));
        assert_eq!(none, "http://h/mcp|none");
        assert_ne!(none, bearer);
        assert_ne!(bearer, other);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let fp = auth_fingerprint(
            AuthType::Bearer,
            &creds(&[("bearer_token", "ééééééééééééé")]),
        );
        assert_eq!(fp, "bearer:éééééééééé");
    }
}
