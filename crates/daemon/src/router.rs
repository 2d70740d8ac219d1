// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the tool-proxy and daemon-management handlers into one
//! `axum::Router` (§6 External Interfaces).

use crate::supervisor::DaemonSupervisor;
use crate::{management, proxy};
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use codemode_core::Clock;
use codemode_registry::SessionRegistry;
use std::sync::Arc;

/// Combined state for both HTTP surfaces, split via `FromRef` so each
/// handler only extracts the piece it needs.
pub struct AppState<C: Clock + 'static> {
    pub registry: Arc<SessionRegistry>,
    pub supervisor: Arc<DaemonSupervisor<C>>,
}

impl<C: Clock + 'static> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry), supervisor: Arc::clone(&self.supervisor) }
    }
}

impl<C: Clock + 'static> FromRef<AppState<C>> for Arc<SessionRegistry> {
    fn from_ref(state: &AppState<C>) -> Self {
        Arc::clone(&state.registry)
    }
}

impl<C: Clock + 'static> FromRef<AppState<C>> for Arc<DaemonSupervisor<C>> {
    fn from_ref(state: &AppState<C>) -> Self {
        Arc::clone(&state.supervisor)
    }
}

/// Build the full router: the tool-proxy surface the in-kernel binding
/// posts to, plus the daemon-management surface the hosting service wires
/// behind its own auth middleware.
pub fn router<C: Clock + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/code-mode/call", post(proxy::call_tool))
        .route("/code-mode/session/:session_id/tools", get(proxy::list_session_tools))
        .route("/daemons", get(management::list_daemons::<C>))
        .route("/daemons/:daemon_id/stop", post(management::stop_daemon::<C>))
        .route("/daemons/chat/:chat_id/stop", post(management::stop_chat_daemons::<C>))
        .with_state(state)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
