// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binding Generator error taxonomy (§7 `BindingError`).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    /// Two tools in the same server group sanitize to the same method name
    /// (§4.E "Naming collisions"): rejected at generation time rather than
    /// silently overwriting one tool's binding with the other's.
    #[error("tools {first_tool:?} and {second_tool:?} both sanitize to method `{method_name}` under server `{server_id}`")]
    NameCollision { server_id: String, method_name: String, first_tool: String, second_tool: String },
}
