//! MCP tool client
//!
//! - `core`: `McpToolClient` state and the request executor
//! - `builder`: fluent construction
//! - `operations`: handshake, connection probe, tool discovery and invocation

pub mod builder;
pub mod core;
pub mod operations;

pub use builder::McpToolClientBuilder;
pub use self::core::{MAX_ATTEMPTS, McpToolClient};
pub use operations::connection::{ConnectionReport, SessionStatus};
pub use operations::tools::ToolListShape;
