//! Gateway behavior against mock HTTP backends.

use serde_json::{Value, json};
use std::time::Duration;
use toolhub_core::{Arguments, GatewaySettings, ServerInfo, ServerStatus};
use toolhub_gateway::{Gateway, GatewayError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway() -> Gateway {
    let settings = GatewaySettings {
        health_timeout_ms: Some(300),
        call_timeout_ms: Some(300),
        ..GatewaySettings::with_defaults()
    };
    Gateway::new(settings).unwrap()
}

fn args(value: Value) -> Arguments {
    value.as_object().cloned().unwrap()
}

fn envelope(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

async fn register(gateway: &Gateway, id: &str, server: &MockServer, tools: &[&str]) {
    gateway
        .register(id, ServerInfo::new(server.uri()).with_tools(tools.iter().copied()))
        .await
        .unwrap();
}

#[tokio::test]
async fn routes_call_to_primary_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp/tools/call"))
        .and(body_partial_json(json!({
            "protocol_version": "2.0",
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": { "name": "ping", "arguments": { "count": 2 } }
        })))
        .respond_with(envelope(json!({ "pong": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/tools/call"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;

    let result = gateway.route_tool_call("ping", args(json!({ "count": 2 }))).await;
    assert_eq!(result, json!({ "pong": true }));
}

#[tokio::test]
async fn last_registration_wins_tool_collisions() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(envelope(json!({ "from": "s1" })))
        .expect(0)
        .mount(&first)
        .await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(envelope(json!({ "from": "s2" })))
        .expect(1)
        .mount(&second)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &first, &["ping"]).await;
    register(&gateway, "s2", &second, &["ping"]).await;

    assert_eq!(gateway.routing_table().await["ping"], "s2");
    assert_eq!(gateway.server_for_tool("ping").await.unwrap().id, "s2");
    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "from": "s2" }));
}

#[tokio::test]
async fn offline_server_is_not_called() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mcp/tools/list"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(envelope(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(path("/tools/call"))
        .respond_with(envelope(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;

    assert_eq!(gateway.get_server_status("s1").await, ServerStatus::Offline);
    assert!(!gateway.get_server("s1").await.unwrap().healthy);
    assert!(gateway.list_all_tools().await.is_empty());

    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "error": "Server for tool 'ping' is offline" }));
}

#[tokio::test]
async fn falls_back_to_legacy_endpoint_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .and(body_partial_json(json!({ "method": "tools/call", "params": { "name": "ping" } })))
        .respond_with(envelope(json!({ "ok": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;

    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "ok": 1 }));
}

#[tokio::test]
async fn falls_back_to_legacy_endpoint_on_timeout() {
    let server = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(envelope(json!({ "late": true })).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    Mock::given(path("/tools/call"))
        .respond_with(envelope(json!({ "legacy": true })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;

    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "legacy": true }));
}

#[tokio::test]
async fn both_endpoints_failing_yields_error_item() {
    let server = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(path("/tools/call"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;

    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "error": "Server error: 502" }));
}

#[tokio::test]
async fn unreachable_server_yields_transport_error() {
    let gateway = gateway();
    gateway
        .register("s1", ServerInfo::new("http://127.0.0.1:9").with_tools(["ping"]))
        .await
        .unwrap();

    let err = gateway
        .try_route_tool_call("ping", &Arguments::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(err.to_string().starts_with("Tool call failed: "));
}

#[tokio::test]
async fn envelope_errors_are_surfaced_without_fallback() {
    let server = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32001, "message": "quota exceeded" }
        })))
        .mount(&server)
        .await;
    Mock::given(path("/tools/call"))
        .respond_with(envelope(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["quota"]).await;

    let result = gateway.route_tool_call("quota", Arguments::new()).await;
    assert_eq!(result, json!({ "error": "Server error -32001: quota exceeded" }));
}

#[tokio::test]
async fn missing_result_is_an_error_item() {
    let server = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1 })))
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;

    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "error": "No result from server" }));
}

#[tokio::test]
async fn null_result_is_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "protocol_version": "2.0",
            "id": 1,
            "result": null
        })))
        .mount(&server)
        .await;
    Mock::given(path("/tools/call"))
        .respond_with(envelope(json!({ "from": "legacy" })))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["clear"]).await;

    let result = gateway.route_tool_call("clear", Arguments::new()).await;
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn probe_result_ignored_after_server_moves() {
    let old = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(150)))
        .mount(&old)
        .await;
    let new = MockServer::start().await;

    let gateway = gateway();
    register(&gateway, "s1", &old, &["ping"]).await;

    let reregister = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        register(&gateway, "s1", &new, &["ping"]).await;
    };
    let (status, ()) = tokio::join!(gateway.get_server_status("s1"), reregister);

    assert_eq!(status, ServerStatus::Error);
    let record = gateway.get_server("s1").await.unwrap();
    assert_eq!(record.url, new.uri());
    assert!(record.healthy);
}

#[tokio::test]
async fn health_endpoint_statuses() {
    let healthy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&healthy)
        .await;
    Mock::given(path("/mcp/tools/list"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&healthy)
        .await;

    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&failing)
        .await;

    let gateway = gateway();
    register(&gateway, "up", &healthy, &["a"]).await;
    register(&gateway, "sick", &failing, &["b"]).await;

    assert_eq!(gateway.get_server_status("up").await, ServerStatus::Online);
    assert_eq!(gateway.get_server_status("sick").await, ServerStatus::Error);
    assert!(gateway.get_server("up").await.unwrap().healthy);
    assert!(!gateway.get_server("sick").await.unwrap().healthy);

    let sick = gateway.route_tool_call("b", Arguments::new()).await;
    assert_eq!(sick, json!({ "error": "Server for tool 'b' is offline" }));
}

#[tokio::test]
async fn protocol_probe_used_when_health_endpoint_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp/tools/list"))
        .and(body_partial_json(json!({ "jsonrpc": "2.0", "method": "tools/list", "id": "health_check" })))
        .respond_with(envelope(json!({ "tools": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;
    assert_eq!(gateway.get_server_status("s1").await, ServerStatus::Online);
}

#[tokio::test]
async fn protocol_probe_used_when_health_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mcp/tools/list"))
        .respond_with(envelope(json!({ "tools": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;
    assert_eq!(gateway.get_server_status("s1").await, ServerStatus::Online);
}

#[tokio::test]
async fn server_recovers_after_successful_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = gateway();
    register(&gateway, "s1", &server, &["ping"]).await;
    assert_eq!(gateway.get_server_status("s1").await, ServerStatus::Error);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/mcp/tools/call"))
        .respond_with(envelope(json!({ "pong": true })))
        .mount(&server)
        .await;

    assert_eq!(gateway.get_server_status("s1").await, ServerStatus::Online);
    let result = gateway.route_tool_call("ping", Arguments::new()).await;
    assert_eq!(result, json!({ "pong": true }));
}

#[tokio::test]
async fn unregister_removes_every_route() {
    let server = MockServer::start().await;
    let gateway = gateway();
    register(&gateway, "s1", &server, &["a", "b"]).await;
    register(&gateway, "s2", &server, &["c"]).await;

    assert!(gateway.unregister_server("s1").await);
    assert!(!gateway.unregister_server("s1").await);

    let routing = gateway.routing_table().await;
    assert_eq!(routing.len(), 1);
    assert!(routing.values().all(|owner| owner == "s2"));
    assert_eq!(gateway.get_server_status("s1").await, ServerStatus::Unknown);

    let result = gateway.route_tool_call("a", Arguments::new()).await;
    assert_eq!(result, json!({ "error": "Tool 'a' not found" }));
}

#[tokio::test]
async fn routing_table_points_only_at_owning_servers() {
    let server = MockServer::start().await;
    let gateway = gateway();
    register(&gateway, "s1", &server, &["a", "b"]).await;
    register(&gateway, "s2", &server, &["b", "c"]).await;
    register(&gateway, "s1", &server, &["a"]).await;
    assert!(gateway.unregister_server("s2").await);

    for (tool, owner) in gateway.routing_table().await {
        let record = gateway.get_server(&owner).await.unwrap();
        assert!(record.provides(&tool), "{tool} routed to {owner}");
    }
    assert!(gateway.server_for_tool("b").await.is_none());
}

#[tokio::test]
async fn list_servers_and_statistics_reprobe() {
    let up = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&up)
        .await;
    let down = MockServer::start().await;

    let gateway = gateway();
    gateway
        .register_server(
            "up",
            json!({ "name": "Up", "url": up.uri(), "tools": ["a", "b"], "metadata": { "tier": 1 } }),
        )
        .await;
    gateway
        .register_server("down", json!({ "url": down.uri(), "tools": ["c"] }))
        .await;

    let servers = gateway.list_servers().await;
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].id, "up");
    assert_eq!(servers[0].name, "Up");
    assert_eq!(servers[0].status, ServerStatus::Online);
    assert_eq!(servers[0].metadata["tier"], json!(1));
    assert_eq!(servers[1].id, "down");
    assert_eq!(servers[1].status, ServerStatus::Offline);

    let stats = gateway.statistics().await;
    assert_eq!(stats.total_servers, 2);
    assert_eq!(stats.online_servers, 1);
    assert_eq!(stats.total_tools, 3);
    assert_eq!(stats.health_summary["down"], ServerStatus::Offline);
    assert_eq!(
        serde_json::to_value(&stats).unwrap()["health_summary"],
        json!({ "up": "online", "down": "offline" })
    );
}
