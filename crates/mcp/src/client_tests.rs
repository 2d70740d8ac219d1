// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request as WireRequest, Respond, ResponseTemplate};

struct JsonRpcResponder {
    body: Value,
    session_id: Option<String>,
}

impl Respond for JsonRpcResponder {
    fn respond(&self, request: &WireRequest) -> ResponseTemplate {
        let parsed: serde_json::Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let id = parsed.get("id").cloned().unwrap_or(Value::from(0));
        let mut template = ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"jsonrpc": "2.0", "id": id, "result": self.body}));
        if let Some(sid) = &self.session_id {
            template = template.insert_header("Mcp-Session-Id", sid.as_str());
        }
        template
    }
}

async fn server_with_tools() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .respond_with(JsonRpcResponder {
            body: serde_json::json!({"tools": [
                {"name": "hue_get_lights", "description": "list lights", "inputSchema": {"type": "object", "properties": {}}}
            ]}),
            session_id: Some("sess-1".to_string()),
        })
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ensure_connected_without_prior_connect_is_not_connected() {
    let client = McpClient::new();
    let err = client.list_tool_specs().await.unwrap_err();
    assert!(matches!(err, McpError::NotConnected));
}

#[tokio::test]
async fn list_tool_specs_after_connect_returns_catalog() {
    let server = server_with_tools().await;
    let url = format!("{}/mcp", server.uri());
    let client = McpClient::new();
    client.connect(url, vec![]).await.unwrap();

    let specs = client.list_tool_specs().await.unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name, "hue_get_lights");
}

#[tokio::test]
async fn ensure_connected_reconnects_after_disconnect() {
    let server = server_with_tools().await;
    let url = format!("{}/mcp", server.uri());
    let client = McpClient::new();
    client.connect(url, vec![]).await.unwrap();
    client.disconnect().await;

    // Should transparently reconnect using the remembered url, not error.
    let specs = client.list_tool_specs().await.unwrap();
    assert_eq!(specs.len(), 1);
}

#[tokio::test]
async fn call_tool_returns_content_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .respond_with(JsonRpcResponder {
            body: serde_json::json!({
                "content": [{"type": "text", "text": "[{\"id\":\"1\",\"on\":true}]"}],
                "isError": false
            }),
            session_id: None,
        })
        .mount(&server)
        .await;

    let client = McpClient::new();
    client.connect(format!("{}/mcp", server.uri()), vec![]).await.unwrap();
    let content = client.call_tool("hue_get_lights", serde_json::Map::new()).await.unwrap();
    assert_eq!(content[0]["type"], "text");
}

#[tokio::test]
async fn call_tool_joins_error_text_items_with_semicolon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .respond_with(JsonRpcResponder {
            body: serde_json::json!({
                "content": [
                    {"type": "text", "text": "bad id"},
                    {"type": "text", "text": "light not found"}
                ],
                "isError": true
            }),
            session_id: None,
        })
        .mount(&server)
        .await;

    let client = McpClient::new();
    client.connect(format!("{}/mcp", server.uri()), vec![]).await.unwrap();
    let err = client.call_tool("hue_set_light", serde_json::Map::new()).await.unwrap_err();
    match err {
        McpError::ToolError(msg) => assert_eq!(msg, "bad id; light not found"),
        other => panic!("expected ToolError, got {other:?}"),
    }
}
