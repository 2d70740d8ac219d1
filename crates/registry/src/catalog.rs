// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tool catalog: `name -> {spec, invoker}` (§3 Data Model).

use async_trait::async_trait;
use codemode_mcp::{McpError, ToolClient, ToolSpec};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(transparent)]
    Tool(#[from] McpError),
}

/// A capability that, given keyword arguments, returns a tool result
/// envelope (§3: "invoker is a capability that... returns a tool result
/// envelope").
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, arguments: serde_json::Map<String, Value>) -> Result<Value, InvokeError>;
}

/// Default invoker: dispatches to a live `ToolClient` under the tool's
/// canonical (un-prefixed-by-registration) name.
pub struct ToolClientInvoker {
    pub client: Arc<dyn ToolClient>,
    pub canonical_name: String,
}

#[async_trait]
impl ToolInvoker for ToolClientInvoker {
    async fn invoke(&self, arguments: serde_json::Map<String, Value>) -> Result<Value, InvokeError> {
        Ok(self.client.call_tool(&self.canonical_name, arguments).await?)
    }
}

/// `{spec, invoker}` for one tool name in a session's catalog (§3).
#[derive(Clone)]
pub struct CatalogEntry {
    pub spec: ToolSpec,
    pub invoker: Arc<dyn ToolInvoker>,
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
