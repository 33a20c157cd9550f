//! Response decoding.
//!
//! A body starting with `event:` is SSE framed and its first `data:` line holds
//! the envelope; any other body is a plain JSON envelope. The `Content-Type`
//! header plays no part. After parsing, an `error` member fails the call;
//! otherwise the `result` member is returned, or the whole envelope for servers
//! that answer with a bare, unwrapped result.

use serde_json::Value;

use crate::sse;
use crate::{Error, Result};

/// Decode a response body, detecting SSE framing from the body itself.
pub fn decode_response(body: &str) -> Result<Value> {
    let envelope = if sse::looks_like_sse(body) {
        parse_sse(body)?
    } else {
        serde_json::from_str::<Value>(body).map_err(|e| {
            Error::protocol(format!("Invalid JSON response: {e}; raw response: {body}"), body)
        })?
    };

    unwrap_envelope(envelope)
}

fn parse_sse(body: &str) -> Result<Value> {
    let payload = sse::first_data_payload(body).ok_or_else(|| {
        Error::protocol(format!("No data line in SSE response: {body}"), body)
    })?;

    serde_json::from_str(payload).map_err(|e| {
        Error::protocol(
            format!("Invalid JSON in SSE data line: {e}; raw response: {body}"),
            body,
        )
    })
}

/// Turn a parsed envelope into its result, or fail on an `error` member.
pub fn unwrap_envelope(envelope: Value) -> Result<Value> {
    match envelope {
        Value::Object(mut map) => {
            if let Some(error) = map.remove("error").filter(|e| !e.is_null()) {
                return Err(Error::server(error_message(&error)));
            }
            match map.remove("result") {
                Some(result) => Ok(result),
                None => Ok(Value::Object(map)),
            }
        }
        other => Ok(other),
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::Object(obj) => match obj.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => error.to_string(),
        },
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}
