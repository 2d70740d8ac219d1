// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel protocol frame shapes.
//!
//! Frames over the kernel-gateway WebSocket are JSON objects of shape
//! `{header, parent_header, content, msg_type, metadata, channel}` (§6); we
//! send exactly one `execute_request` per daemon run and classify every
//! frame we receive back by `msg_type` (§4.G step 3).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `header` of an outgoing or incoming frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub msg_id: String,
    pub msg_type: String,
    pub username: String,
    pub session: String,
    pub date: String,
    pub version: String,
}

/// `parent_header` of an incoming frame; correlation is by `msg_id` (§6).
/// An execute request itself carries an empty `parent_header`, so every
/// field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParentHeader {
    pub msg_id: Option<String>,
}

/// A raw frame as received from the kernel-gateway channels WebSocket.
///
/// `content` is left as `Value` and decoded per `msg_type` by the runner
/// (§4.G), since the shape varies by message kind and unknown kinds must be
/// ignored rather than rejected (§7 `ProtocolError`: "logged & skipped, not
/// fatal").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelFrame {
    pub header: Header,
    #[serde(default)]
    pub parent_header: ParentHeader,
    #[serde(default)]
    pub metadata: Value,
    pub content: Value,
    pub msg_type: String,
    #[serde(default)]
    pub channel: String,
}

impl KernelFrame {
    /// Whether this frame answers the given outgoing `msg_id` (§6, §8:
    /// "a frame whose `parent_header.msg_id` does not match the execute
    /// request never produces an event").
    pub fn answers(&self, msg_id: &str) -> bool {
        self.parent_header.msg_id.as_deref() == Some(msg_id)
    }
}

/// The single `execute_request` a runner sends per daemon (§4.G step 1).
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub header: Header,
    pub parent_header: serde_json::Map<String, Value>,
    pub metadata: serde_json::Map<String, Value>,
    pub content: ExecuteRequestContent,
    pub channel: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequestContent {
    pub code: String,
    pub silent: bool,
    pub store_history: bool,
    pub user_expressions: serde_json::Map<String, Value>,
    pub allow_stdin: bool,
    pub stop_on_error: bool,
}

impl ExecuteRequest {
    /// Build the single execute request for `code`, generating a fresh
    /// `msg_id`. Flags are fixed per §4.G step 1.
    pub fn new(code: impl Into<String>, msg_id: impl Into<String>, session: impl Into<String>) -> Self {
        let msg_id = msg_id.into();
        Self {
            header: Header {
                msg_id,
                msg_type: "execute_request".to_string(),
                username: "user".to_string(),
                session: session.into(),
                date: String::new(),
                version: "5.3".to_string(),
            },
            parent_header: serde_json::Map::new(),
            metadata: serde_json::Map::new(),
            content: ExecuteRequestContent {
                code: code.into(),
                silent: false,
                store_history: true,
                user_expressions: serde_json::Map::new(),
                allow_stdin: false,
                stop_on_error: true,
            },
            channel: "shell",
        }
    }

    pub fn msg_id(&self) -> &str {
        &self.header.msg_id
    }
}

/// Generate a fresh hex message id, matching the upstream kernel gateway's
/// `uuid.uuid4().hex` format: a plain v4 UUID with no hyphens.
pub fn generate_msg_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Decoded `stream` content: `{name, text}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamContent {
    #[serde(default = "default_stream_name")]
    pub name: String,
    #[serde(default)]
    pub text: String,
}

fn default_stream_name() -> String {
    "stdout".to_string()
}

/// Decoded `execute_result`/`display_data` content: only `data` matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayContent {
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

/// Decoded `error` content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorContent {
    #[serde(default)]
    pub ename: String,
    #[serde(default)]
    pub evalue: String,
    #[serde(default)]
    pub traceback: Vec<String>,
}

/// Decoded `status` content.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusContent {
    pub execution_state: String,
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
