//! Session-loss detection.
//!
//! Servers report a lost or expired protocol session in many ways. The client
//! treats a transport failure as session loss when its text contains any of
//! [`SESSION_LOSS_MARKERS`], compared case-insensitively. Server, protocol and
//! configuration errors never qualify.

use toolbridge_protocol::Error;

/// Substrings that mark a transport failure as a lost session.
pub const SESSION_LOSS_MARKERS: &[&str] = &[
    "invalid session",
    "session expired",
    "unauthorized",
    "401",
    "403",
];

/// Whether `err` looks like the server no longer accepts the current session.
pub fn is_session_loss(err: &Error) -> bool {
    if !err.is_transport() {
        return false;
    }
    let text = err.to_string().to_lowercase();
    SESSION_LOSS_MARKERS.iter().any(|marker| text.contains(marker))
}
