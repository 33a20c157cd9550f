//! # toolbridge protocol layer
//!
//! Pure, I/O-free building blocks for talking to a remote Model Context
//! Protocol server over HTTP:
//!
//! - [`jsonrpc`]: the JSON-RPC 2.0 request envelope (notifications carry no id)
//! - [`sse`]: extraction of the payload from a Server-Sent-Events framed body
//! - [`codec`]: decoding a response body (plain JSON or SSE) into its `result`
//! - [`types`]: the MCP parameter shapes this client sends
//! - [`error`]: the error type shared by every toolbridge crate
//!
//! ## Example
//!
//! ```rust
//! use toolbridge_protocol::{RpcRequest, decode_response};
//!
//! let request = RpcRequest::new("tools/list", Some(1), None);
//! assert_eq!(
//!     serde_json::to_string(&request).unwrap(),
//!     r#"{"jsonrpc":"2.0","method":"tools/list","id":1}"#
//! );
//!
//! let result = decode_response("event: message\ndata: {\"result\":42}\n").unwrap();
//! assert_eq!(result, serde_json::json!(42));
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod codec;
pub mod error;
pub mod jsonrpc;
pub mod sse;
pub mod types;

pub use codec::decode_response;
pub use error::{Error, ErrorKind, Result};
pub use jsonrpc::{JSONRPC_VERSION, RpcRequest, is_notification};
pub use types::{
    CallToolParams, ClientCapabilities, ClientInfo, InitializeParams, PROTOCOL_VERSION,
};
