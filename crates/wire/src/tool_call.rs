// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tool-call envelope exchanged between the in-kernel binding and the
//! Tool Proxy Endpoint (§3 "Tool call envelope", §6 tool-proxy HTTP surface).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST {base}/code-mode/call` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub tool_name: String,
    pub arguments: serde_json::Map<String, Value>,
    pub session_id: String,
}

/// `POST {base}/code-mode/call` response body: exactly one of `result`/`error`
/// is non-null (§3). Errors are carried in-band at HTTP 200 (§7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallResponse {
    pub fn ok(result: Value) -> Self {
        Self { result: Some(result), error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self { result: None, error: Some(message.into()) }
    }
}

/// Content-envelope items (§3) are kept as raw `serde_json::Value` end to
/// end rather than a closed Rust enum: the unwrapper (§4.E) must pass
/// unrecognized item shapes through byte-for-byte, which a strict enum would
/// lose. These are convenience constructors for tests and fake tool servers.
pub mod content_item {
    use super::Value;

    pub fn text(text: impl Into<String>) -> Value {
        serde_json::json!({ "type": "text", "text": text.into() })
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Value {
        serde_json::json!({ "type": "image", "data": data.into(), "mimeType": mime_type.into() })
    }
}

#[cfg(test)]
#[path = "tool_call_tests.rs"]
mod tests;
