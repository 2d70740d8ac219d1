// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool Client error taxonomy (§7): `NotConnected` and `ToolError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("tool server is not connected")]
    NotConnected,

    #[error("tool server returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("tool server request failed: {0}")]
    Transport(String),

    #[error("tool server RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("MCP tool error: {0}")]
    ToolError(String),
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        McpError::Transport(err.to_string())
    }
}
