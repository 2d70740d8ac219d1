// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types: the Jupyter-protocol kernel frame shapes (§6 "Kernel-gateway
//! wire contract") and the tool-call envelope exchanged between the
//! in-kernel binding and the Tool Proxy Endpoint (§3 "Tool call envelope").

pub mod kernel;
pub mod tool_call;

pub use kernel::{ExecuteRequest, Header, KernelFrame, ParentHeader};
pub use tool_call::{content_item, ToolCallRequest, ToolCallResponse};
