//! # toolbridge client
//!
//! Exposes the tools of a remote MCP (Model Context Protocol) server, reached
//! over HTTP, as callable actions.
//!
//! ## Features
//!
//! - Protocol sessions reused across client instances through a shared,
//!   expiring [`SessionCache`] keyed by server and credential fingerprint
//! - One-shot recovery when the server rejects a session: the cached entry is
//!   invalidated, the handshake re-run and the request reissued once
//! - Tolerant tool discovery: four `tools/list` result shapes and four schema
//!   key spellings are normalized into [`ToolDescriptor`]s
//! - A connection probe that never fails and never echoes upstream detail
//!
//! ## Architecture
//!
//! ```text
//! McpToolClient (this crate)
//!        ↓
//! HTTP transport + auth (toolbridge-http)
//!        ↓
//! Envelope / codec / errors (toolbridge-protocol)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde_json::{Map, json};
//! use toolbridge_client::{McpToolClient, ServerConfig};
//!
//! # async fn example() -> toolbridge_protocol::Result<()> {
//! let client = McpToolClient::new(ServerConfig::bearer(
//!     "https://mcp.example.com/mcp",
//!     "my-token",
//! ))?;
//!
//! let report = client.test_connection().await;
//! println!("{}", report.message);
//!
//! let mut args = Map::new();
//! args.insert("q".to_string(), json!("hello"));
//! let result = client.execute_action("search", args).await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod recovery;
pub mod schema;
pub mod session;
pub mod tool;

pub use client::{
    ConnectionReport, McpToolClient, McpToolClientBuilder, SessionStatus, ToolListShape,
};
pub use config::{ConfigField, ServerConfig, config_requirements};
pub use credentials::CredentialStore;
pub use recovery::is_session_loss;
pub use schema::{NormalizedSchema, ToolDescriptor};
pub use session::{Clock, ManualClock, SessionCache, SessionCacheStats, SystemClock};
pub use tool::Tool;

pub use toolbridge_http::AuthType;
pub use toolbridge_protocol::{Error, ErrorKind, Result};
