//! # JSON-RPC 2.0 request envelope
//!
//! Requests are encoded as `{"jsonrpc":"2.0","method":..,"id":..,"params":..}`.
//! Methods under the `notifications/` namespace are fire-and-forget: they never
//! carry an `id` and the server's reply body is never decoded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// JSON-RPC version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Method prefix that marks a notification.
pub const NOTIFICATION_PREFIX: &str = "notifications/";

/// Whether `method` is a notification (no id, no parsed result).
pub fn is_notification(method: &str) -> bool {
    method.starts_with(NOTIFICATION_PREFIX)
}

/// JSON-RPC version marker, always serialized as `"2.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let version = String::deserialize(deserializer)?;
        if version == JSONRPC_VERSION {
            Ok(JsonRpcVersion)
        } else {
            Err(serde::de::Error::custom(format!(
                "Invalid JSON-RPC version: expected '{JSONRPC_VERSION}', got '{version}'"
            )))
        }
    }
}

/// An outgoing JSON-RPC request or notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version
    pub jsonrpc: JsonRpcVersion,
    /// Method name
    pub method: String,
    /// Request identifier; absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Method parameters; absent when not supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    /// Build an envelope for `method`.
    ///
    /// The `id` is dropped for notification methods no matter what the caller
    /// passed, so a notification can never be mistaken for a call.
    pub fn new(method: impl Into<String>, id: Option<u64>, params: Option<Value>) -> Self {
        let method = method.into();
        let id = if is_notification(&method) { None } else { id };
        Self {
            jsonrpc: JsonRpcVersion,
            method,
            id,
            params,
        }
    }

    /// Build a notification envelope.
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(method, None, params)
    }

    /// Whether this envelope is a notification.
    pub fn is_notification(&self) -> bool {
        is_notification(&self.method)
    }

    /// Serialize to the compact wire form.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
