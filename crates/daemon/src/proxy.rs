// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Tool Proxy Endpoint (§4.D): the HTTP surface the generated Python
//! binding posts to from inside the kernel.

use crate::error::ProxyError;
use axum::extract::{Path, State};
use axum::Json;
use codemode_registry::SessionRegistry;
use codemode_wire::tool_call::{ToolCallRequest, ToolCallResponse};
use serde::Serialize;
use std::sync::Arc;

/// `POST {base}/code-mode/call` (§6).
///
/// Errors raised by the invoker are carried in-band at HTTP 200 — the
/// in-kernel binding must raise them inside user code, not see a transport
/// failure (§9 "In-band vs out-of-band errors").
pub async fn call_tool(
    State(registry): State<Arc<SessionRegistry>>,
    Json(request): Json<ToolCallRequest>,
) -> Result<Json<ToolCallResponse>, ProxyError> {
    let session = registry
        .lookup(&request.session_id)
        .ok_or_else(|| ProxyError::SessionNotFound(request.session_id.clone()))?;

    let entry = session
        .tool_catalog
        .get(&request.tool_name)
        .ok_or_else(|| ProxyError::ToolNotFound(request.tool_name.clone()))?;

    match entry.invoker.invoke(request.arguments).await {
        Ok(result) => Ok(Json(ToolCallResponse::ok(result))),
        Err(e) => Ok(Json(ToolCallResponse::err(e.to_string()))),
    }
}

#[derive(Debug, Serialize)]
pub struct ToolListEntry {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolListEntry>,
}

/// `GET {base}/code-mode/session/{session_id}/tools` (§6).
pub async fn list_session_tools(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
) -> Result<Json<ToolListResponse>, ProxyError> {
    let session = registry.lookup(&session_id).ok_or(ProxyError::SessionNotFound(session_id))?;

    let tools = session
        .tool_catalog
        .values()
        .map(|entry| ToolListEntry {
            name: entry.spec.name.clone(),
            description: entry.spec.description.clone(),
            parameters: entry.spec.parameters.clone(),
        })
        .collect();

    Ok(Json(ToolListResponse { tools }))
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
