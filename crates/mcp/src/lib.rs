// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool Client: one handle per live connection to a remote tool server (an
//! MCP server), speaking JSON-RPC 2.0 over the MCP "streamable HTTP"
//! transport, with `connect`/`ensure_connected`/`list_tool_specs`/
//! `call_tool`/`list_resources`/`read_resource`/`disconnect`.

pub mod client;
pub mod error;
pub mod rpc;

pub use client::{McpClient, ToolClient, ToolSpec};
pub use error::McpError;
