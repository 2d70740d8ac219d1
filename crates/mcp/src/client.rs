// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `McpClient`: one connection to a remote tool server (§4.B).

use crate::error::McpError;
use crate::rpc::{Request, Response};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;

const INITIALIZE_TIMEOUT: Duration = Duration::from_secs(10);
const TOOL_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// `{name, description, parameters-as-JSON-schema}` (§3, §4.B).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Operations a Session's catalog invoker dispatches through (§4.B, §4.D).
/// A trait so the registry and proxy can hold `Arc<dyn ToolClient>` and so
/// tests can substitute a fake tool server without a live MCP connection.
#[async_trait]
pub trait ToolClient: Send + Sync {
    async fn list_tool_specs(&self) -> Result<Vec<ToolSpec>, McpError>;
    async fn call_tool(&self, name: &str, arguments: serde_json::Map<String, Value>) -> Result<Value, McpError>;
    async fn disconnect(&self);
}

#[derive(Default)]
struct State {
    connected: bool,
    next_id: u64,
    url: Option<String>,
    headers: Vec<(String, String)>,
    session_id: Option<String>,
}

/// HTTP JSON-RPC client to one MCP "streamable HTTP" tool server.
pub struct McpClient {
    http: reqwest::Client,
    state: Mutex<State>,
}

impl Default for McpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl McpClient {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new(), state: Mutex::new(State::default()) }
    }

    /// Connect and run the MCP `initialize` handshake (§4.B `connect`).
    pub async fn connect(&self, url: impl Into<String>, headers: Vec<(String, String)>) -> Result<(), McpError> {
        let url = url.into();
        {
            let mut state = self.state.lock();
            state.url = Some(url.clone());
            state.headers = headers.clone();
        }
        let init_params = serde_json::json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "codemode-daemon", "version": env!("CARGO_PKG_VERSION")},
        });
        let (_result, session_id) = tokio::time::timeout(
            INITIALIZE_TIMEOUT,
            self.send_rpc_raw(&url, &headers, None, "initialize", init_params),
        )
        .await
        .map_err(|_| McpError::Transport("MCP initialize timed out".to_string()))??;

        let mut state = self.state.lock();
        state.connected = true;
        state.session_id = session_id;
        Ok(())
    }

    /// Reconnect if the session has been lost (§4.B `_ensure_connected`):
    /// idempotent, no-op when healthy, `NotConnected` if never connected.
    pub async fn ensure_connected(&self) -> Result<(), McpError> {
        let (connected, url, headers) = {
            let state = self.state.lock();
            (state.connected, state.url.clone(), state.headers.clone())
        };
        if connected {
            return Ok(());
        }
        match url {
            Some(url) => {
                tracing::debug!(%url, "MCP client reconnecting");
                self.connect(url, headers).await
            }
            None => Err(McpError::NotConnected),
        }
    }

    fn next_id(&self) -> u64 {
        let mut state = self.state.lock();
        state.next_id += 1;
        state.next_id
    }

    async fn send_rpc(&self, method: &str, params: Value) -> Result<Value, McpError> {
        let (url, headers, session_id) = {
            let state = self.state.lock();
            (state.url.clone(), state.headers.clone(), state.session_id.clone())
        };
        let url = url.ok_or(McpError::NotConnected)?;
        let id = self.next_id();
        let (result, _) =
            self.send_rpc_with_id(&url, &headers, session_id.as_deref(), id, method, params).await?;
        Ok(result)
    }

    async fn send_rpc_raw(
        &self,
        url: &str,
        headers: &[(String, String)],
        session_id: Option<&str>,
        method: &str,
        params: Value,
    ) -> Result<(Value, Option<String>), McpError> {
        self.send_rpc_with_id(url, headers, session_id, 0, method, params).await
    }

    async fn send_rpc_with_id(
        &self,
        url: &str,
        headers: &[(String, String)],
        session_id: Option<&str>,
        id: u64,
        method: &str,
        params: Value,
    ) -> Result<(Value, Option<String>), McpError> {
        let body = Request::new(id, method, params);
        let mut req = self.http.post(url).json(&body);
        for (k, v) in headers {
            req = req.header(k.as_str(), v.as_str());
        }
        if let Some(sid) = session_id {
            req = req.header("Mcp-Session-Id", sid);
        }

        let resp = tokio::time::timeout(TOOL_CALL_TIMEOUT, req.send())
            .await
            .map_err(|_| McpError::Transport("MCP request timed out".to_string()))??;

        let status = resp.status();
        let new_session_id = resp
            .headers()
            .get("Mcp-Session-Id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(McpError::Upstream { status: status.as_u16(), body });
        }

        let parsed: Response = resp.json().await?;
        if let Some(err) = parsed.error {
            return Err(McpError::Rpc { code: err.code, message: err.message });
        }
        Ok((parsed.result.unwrap_or(Value::Null), new_session_id))
    }

    /// `list_resources`: optional MCP operation, best-effort resource-listing extension beyond tool calls.
    pub async fn list_resources(&self, cursor: Option<&str>) -> Result<Vec<Value>, McpError> {
        self.ensure_connected().await?;
        let params = match cursor {
            Some(c) => serde_json::json!({ "cursor": c }),
            None => serde_json::json!({}),
        };
        let result = self.send_rpc("resources/list", params).await?;
        Ok(result.get("resources").and_then(|v| v.as_array()).cloned().unwrap_or_default())
    }

    /// `read_resource`: optional MCP operation, best-effort resource-read extension beyond tool calls.
    pub async fn read_resource(&self, uri: &str) -> Result<Value, McpError> {
        self.ensure_connected().await?;
        let params = serde_json::json!({ "uri": uri });
        self.send_rpc("resources/read", params).await
    }
}

#[async_trait]
impl ToolClient for McpClient {
    async fn list_tool_specs(&self) -> Result<Vec<ToolSpec>, McpError> {
        self.ensure_connected().await?;
        let result = self.send_rpc("tools/list", serde_json::json!({})).await?;
        let tools = result.get("tools").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        Ok(tools
            .into_iter()
            .map(|t| ToolSpec {
                name: t.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                description: t.get("description").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                parameters: t.get("inputSchema").cloned().unwrap_or(Value::Null),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: serde_json::Map<String, Value>) -> Result<Value, McpError> {
        self.ensure_connected().await?;
        let params = serde_json::json!({ "name": name, "arguments": Value::Object(arguments) });
        let result = self.send_rpc("tools/call", params).await?;

        let content = result.get("content").cloned().unwrap_or(Value::Array(vec![]));
        let is_error = result.get("isError").and_then(|v| v.as_bool()).unwrap_or(false);
        if is_error {
            let text_items: Vec<String> = content
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter(|i| i.get("type").and_then(|v| v.as_str()) == Some("text"))
                        .filter_map(|i| i.get("text").and_then(|v| v.as_str()).map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let message = if text_items.is_empty() { content.to_string() } else { text_items.join("; ") };
            return Err(McpError::ToolError(message));
        }
        Ok(content)
    }

    async fn disconnect(&self) {
        let mut state = self.state.lock();
        state.connected = false;
        state.session_id = None;
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
