//! # toolbridge HTTP transport
//!
//! One JSON-RPC envelope per `POST`, with:
//!
//! - `Content-Type: application/json` and
//!   `Accept: application/json, text/event-stream` on every request
//! - `Mcp-Session-Id` attached once the caller knows a session id
//! - the server's `mcp-session-id` response header (any case) surfaced on the
//!   reply, even when the status is an error
//! - authentication bound once from the declared auth type ([`AuthBinding`])
//!
//! Session bookkeeping and recovery live in `toolbridge-client`; this crate
//! only moves bytes.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

mod auth;
mod transport;

pub use auth::{AuthBinding, AuthType, DEFAULT_API_KEY_HEADER};
pub use transport::{
    ACCEPT_VALUE, DEFAULT_TIMEOUT, HttpReply, HttpTransport, HttpTransportConfig, SESSION_HEADER,
};
