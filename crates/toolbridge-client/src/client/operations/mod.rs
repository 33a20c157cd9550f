//! Client operations
//!
//! - `connection`: session handshake and connection probe
//! - `tools`: tool discovery and invocation

pub mod connection;
pub mod tools;
