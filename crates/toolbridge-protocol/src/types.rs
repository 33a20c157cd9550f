//! MCP parameter types sent by this client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol revision announced in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Method names used by the client.
pub mod methods {
    /// Handshake request
    pub const INITIALIZE: &str = "initialize";
    /// Handshake completion notification
    pub const INITIALIZED: &str = "notifications/initialized";
    /// Tool listing
    pub const TOOLS_LIST: &str = "tools/list";
    /// Tool invocation
    pub const TOOLS_CALL: &str = "tools/call";
}

/// Client identity reported during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name
    pub name: String,
    /// Client version
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: "toolbridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `roots` capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootsCapability {
    /// Whether the client emits roots/list_changed notifications
    pub list_changed: bool,
}

/// Empty capability marker, serialized as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingCapability {}

/// Capabilities advertised by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCapabilities {
    /// Roots support
    pub roots: RootsCapability,
    /// Sampling support
    pub sampling: SamplingCapability,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            roots: RootsCapability { list_changed: true },
            sampling: SamplingCapability::default(),
        }
    }
}

/// Parameters of the `initialize` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol revision
    pub protocol_version: String,
    /// Client capabilities
    pub capabilities: ClientCapabilities,
    /// Client identity
    pub client_info: ClientInfo,
}

impl InitializeParams {
    /// Handshake parameters for the given client identity.
    pub fn new(client_info: ClientInfo) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info,
        }
    }
}

/// Parameters of the `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Tool name
    pub name: String,
    /// Argument mapping
    pub arguments: Map<String, Value>,
}
