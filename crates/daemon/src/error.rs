// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the daemon supervisor, runner, and tool proxy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can abort `start_daemon` before a daemon is registered.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("maximum concurrent background scripts ({limit}) reached for this user")]
    QuotaExceeded { limit: usize },

    #[error("kernel gateway error: {0}")]
    Kernel(#[from] codemode_kernel::KernelError),

    #[error("failed to connect to kernel channels websocket: {0}")]
    WebSocket(String),
}

/// Tool proxy errors, carrying the exact 404/404/500 distinctions via a
/// dedicated `IntoResponse` impl rather than a blanket 500 mapping.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("code mode session not found: {0}")]
    SessionNotFound(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Unreachable via the normal catalog-lookup path: a `CatalogEntry`
    /// always carries a non-optional invoker. Kept for taxonomy
    /// completeness in case a caller hand-builds a degenerate entry.
    #[error("tool {0} has no invoker")]
    NoInvoker(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::ToolNotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::NoInvoker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
