//! Shared mock-server helpers for client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use toolbridge_client::{McpToolClient, ServerConfig, SessionCache};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub fn rpc(name: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(body_partial_json(json!({"method": name})))
}

/// Mount `initialize` (optionally assigning `session_id`) and the
/// `notifications/initialized` acknowledgement.
pub async fn mount_handshake(server: &MockServer, session_id: Option<&str>, times: u64) {
    let mut reply = ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "protocolVersion": "2024-11-05",
            "capabilities": {"tools": {}},
            "serverInfo": {"name": "mock", "version": "1.0.0"}
        }
    }));
    if let Some(session_id) = session_id {
        reply = reply.insert_header("mcp-session-id", session_id);
    }

    rpc("initialize")
        .respond_with(reply)
        .expect(times)
        .mount(server)
        .await;

    rpc("notifications/initialized")
        .respond_with(ResponseTemplate::new(202))
        .mount(server)
        .await;
}

pub fn client_for(config: ServerConfig, cache: &Arc<SessionCache>) -> McpToolClient {
    McpToolClient::builder(config)
        .session_cache(Arc::clone(cache))
        .build()
        .unwrap()
}

pub fn config_for(server: &MockServer) -> ServerConfig {
    ServerConfig::new(format!("{}/mcp", server.uri())).with_timeout(5)
}

pub async fn requests_for(server: &MockServer, rpc_method: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| {
            request
                .body_json::<Value>()
                .map(|body| body["method"] == rpc_method)
                .unwrap_or(false)
        })
        .collect()
}

pub fn session_header(request: &Request) -> Option<String> {
    request
        .headers
        .get("mcp-session-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
