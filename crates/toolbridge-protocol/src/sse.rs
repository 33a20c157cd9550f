//! Server-Sent Events (SSE) framing.
//!
//! A POST answered with `text/event-stream` carries its JSON-RPC response in a
//! `data:` field:
//!
//! ```text
//! event: message
//! data: {"jsonrpc":"2.0","id":1,"result":{}}
//!
//! ```
//!
//! Only the first `data:` line is consumed. Every other field (`event:`, `id:`,
//! `retry:`, comments) is ignored.

/// Field prefix that carries the payload.
pub const DATA_FIELD: &str = "data:";

/// Field prefix that names the event type.
pub const EVENT_FIELD: &str = "event:";

/// Whether a raw body is SSE framed: it must open with an `event:` field.
pub fn looks_like_sse(body: &str) -> bool {
    body.starts_with(EVENT_FIELD)
}

/// Return the trimmed payload of the first `data:` line, if any.
pub fn first_data_payload(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix(DATA_FIELD))
        .map(str::trim)
}
