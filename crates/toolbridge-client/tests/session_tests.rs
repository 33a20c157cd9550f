//! Session establishment, reuse, expiry and recovery against a mock MCP server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use serial_test::serial;
use toolbridge_client::{
    ErrorKind, ManualClock, McpToolClient, ServerConfig, SessionCache, SessionStatus,
};
use wiremock::matchers::header;
use wiremock::{MockServer, ResponseTemplate};

use common::{client_for, config_for, mount_handshake, requests_for, rpc, session_header};

fn search_args() -> Map<String, Value> {
    let mut args = Map::new();
    args.insert("q".to_string(), json!("hello"));
    args
}

#[tokio::test]
async fn test_handshake_session_is_sent_on_later_requests() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 1).await;

    rpc("tools/list")
        .and(header("Mcp-Session-Id", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"tools": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);

    let tools = client.discover_tools().await.unwrap();
    assert!(tools.is_empty());
    assert_eq!(client.session_id().as_deref(), Some("s1"));
    assert_eq!(cache.get(client.cache_key()).as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_handshake_wire_format() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 1).await;

    let cache = Arc::new(SessionCache::new());
    let client = McpToolClient::builder(config_for(&server))
        .session_cache(cache)
        .client_info("agent", "2.0.0")
        .build()
        .unwrap();

    let status = client.ensure_session().await;
    assert!(matches!(
        status,
        SessionStatus::Initialized { ref session_id, .. } if session_id.as_deref() == Some("s1")
    ));

    let init = requests_for(&server, "initialize").await;
    assert_eq!(init.len(), 1);
    let body: Value = init[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({
            "jsonrpc": "2.0",
            "method": "initialize",
            "id": 1,
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"roots": {"listChanged": true}, "sampling": {}},
                "clientInfo": {"name": "agent", "version": "2.0.0"}
            }
        })
    );
    assert_eq!(
        init[0].headers.get("accept").unwrap(),
        "application/json, text/event-stream"
    );

    let notified = requests_for(&server, "notifications/initialized").await;
    assert_eq!(notified.len(), 1);
    let body: Value = notified[0].body_json().unwrap();
    assert_eq!(body, json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    assert_eq!(session_header(&notified[0]).as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_second_client_reuses_cached_session() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 1).await;

    let cache = Arc::new(SessionCache::new());
    let config = config_for(&server)
        .with_auth_type(toolbridge_client::AuthType::Bearer)
        .with_credential("bearer_token", "tok123456789");

    let first = client_for(config.clone(), &cache);
    assert!(matches!(
        first.ensure_session().await,
        SessionStatus::Initialized { .. }
    ));

    let second = client_for(config, &cache);
    assert_eq!(first.cache_key(), second.cache_key());

    let status = second.ensure_session().await;
    assert!(status.is_cached());
    assert_eq!(status.session_id(), Some("s1"));
    assert_eq!(second.session_id().as_deref(), Some("s1"));

    // Only the first client touched the network.
    assert_eq!(requests_for(&server, "initialize").await.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_different_credentials_do_not_share_sessions() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 2).await;

    let cache = Arc::new(SessionCache::new());
    let alice = client_for(ServerConfig::bearer(format!("{}/mcp", server.uri()), "alice-token"), &cache);
    let bob = client_for(ServerConfig::bearer(format!("{}/mcp", server.uri()), "bob-token-x"), &cache);

    assert!(!alice.ensure_session().await.is_cached());
    assert!(!bob.ensure_session().await.is_cached());
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_expired_session_triggers_new_handshake() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 2).await;

    let clock = Arc::new(ManualClock::new());
    let cache = Arc::new(SessionCache::with_clock(clock.clone()));
    let client = client_for(config_for(&server), &cache);

    assert!(!client.ensure_session().await.is_cached());

    clock.advance(Duration::from_secs(1801));
    let status = client.ensure_session().await;
    assert!(matches!(status, SessionStatus::Initialized { .. }));
    assert_eq!(cache.stats().expirations, 1);
    assert_eq!(requests_for(&server, "initialize").await.len(), 2);
}

#[tokio::test]
async fn test_unauthorized_session_is_recovered_once() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s2"), 1).await;

    rpc("tools/call")
        .and(header("Mcp-Session-Id", "s1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;
    rpc("tools/call")
        .and(header("Mcp-Session-Id", "s2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": {"content": [{"type": "text", "text": "hello back"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);
    cache.put(client.cache_key(), "s1");

    let result = client.execute_action("search", search_args()).await.unwrap();
    assert_eq!(
        result,
        json!({"content": [{"type": "text", "text": "hello back"}]})
    );

    let calls = requests_for(&server, "tools/call").await;
    assert_eq!(calls.len(), 2);
    let body: Value = calls[1].body_json().unwrap();
    assert_eq!(body["params"], json!({"name": "search", "arguments": {"q": "hello"}}));

    assert_eq!(client.session_id().as_deref(), Some("s2"));
    assert_eq!(cache.get(client.cache_key()).as_deref(), Some("s2"));
    assert_eq!(cache.stats().invalidations, 1);
}

#[tokio::test]
async fn test_persistent_rejection_exhausts_recovery() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s2"), 1).await;

    rpc("tools/call")
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(2)
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);
    cache.put(client.cache_key(), "s1");

    let err = client.execute_action("search", search_args()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SessionRecoveryExhausted);
    assert!(err.to_string().starts_with("Failed to execute action 'search'"));
}

#[tokio::test]
async fn test_rejection_without_session_is_not_retried() {
    let server = MockServer::start().await;
    mount_handshake(&server, None, 1).await;

    rpc("tools/call")
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);

    let err = client.execute_action("search", search_args()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.http_status_code(), Some(403));
    assert!(client.session_id().is_none());
}

#[tokio::test]
async fn test_non_session_failure_is_not_retried() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 1).await;

    rpc("tools/call")
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);

    let err = client.execute_action("search", search_args()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(cache.stats().invalidations, 0);
}

#[tokio::test]
async fn test_handshake_failure_falls_back() {
    let server = MockServer::start().await;

    rpc("initialize")
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    rpc("tools/call")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"ok": true}})))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);

    // A server that cannot handshake may still serve calls.
    let result = client.execute_action("search", search_args()).await.unwrap();
    assert_eq!(result, json!({"ok": true}));
    assert!(requests_for(&server, "notifications/initialized").await.is_empty());
}

#[tokio::test]
async fn test_request_ids_count_up_and_skip_notifications() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("s1"), 1).await;
    rpc("tools/list")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"tools": []}})))
        .mount(&server)
        .await;

    let cache = Arc::new(SessionCache::new());
    let client = client_for(config_for(&server), &cache);
    client.discover_tools().await.unwrap();

    let ids: Vec<Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.body_json::<Value>().unwrap()["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), Value::Null, json!(2)]);
}

#[tokio::test]
#[serial]
async fn test_default_clients_share_the_global_cache() {
    let server = MockServer::start().await;
    mount_handshake(&server, Some("g1"), 1).await;

    let first = McpToolClient::new(config_for(&server)).unwrap();
    let second = McpToolClient::new(config_for(&server)).unwrap();
    assert!(Arc::ptr_eq(first.session_cache(), &SessionCache::global()));

    first.ensure_session().await;
    assert!(second.ensure_session().await.is_cached());

    SessionCache::global().invalidate(first.cache_key());
}
