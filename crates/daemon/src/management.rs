// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-management HTTP surface (§6).
//!
//! Authentication is out of scope (§1): the caller's identity arrives as an
//! axum `Extension`, the way an upstream auth middleware would inject it,
//! so these handlers stay testable without any auth stack of their own.

use crate::supervisor::DaemonSupervisor;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use codemode_core::{Clock, DaemonStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A pre-validated caller identity, injected by the surrounding service's
/// auth middleware (§6 "Wiring convention").
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct DaemonSnapshot {
    pub daemon_id: String,
    pub kernel_id: String,
    pub user_id: String,
    pub chat_id: String,
    pub message_id: String,
    pub started_at: u64,
    pub status: DaemonStatus,
}

impl From<crate::supervisor::DaemonInfo> for DaemonSnapshot {
    fn from(info: crate::supervisor::DaemonInfo) -> Self {
        Self {
            daemon_id: info.daemon_id.to_string(),
            kernel_id: info.kernel_id,
            user_id: info.user_id.to_string(),
            chat_id: info.chat_id.to_string(),
            message_id: info.message_id.to_string(),
            started_at: info.started_at,
            status: info.status,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListDaemonsQuery {
    pub chat_id: Option<String>,
}

/// `GET /daemons?chat_id=…` — the caller's own daemons (§6).
pub async fn list_daemons<C: Clock + 'static>(
    State(supervisor): State<Arc<DaemonSupervisor<C>>>,
    Extension(identity): Extension<CallerIdentity>,
    Query(query): Query<ListDaemonsQuery>,
) -> Json<Vec<DaemonSnapshot>> {
    let daemons = supervisor.list_daemons(Some(&identity.user_id), query.chat_id.as_deref());
    Json(daemons.into_iter().map(DaemonSnapshot::from).collect())
}

/// `POST /daemons/{daemon_id}/stop` (§6).
///
/// Unknown daemons return 404 to admins (who may legitimately probe ids
/// that never existed) and 403 to everyone else, so a non-owner cannot use
/// the distinction to learn whether a given id exists.
pub async fn stop_daemon<C: Clock + 'static>(
    State(supervisor): State<Arc<DaemonSupervisor<C>>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(daemon_id): Path<String>,
) -> Response {
    match supervisor.info(&daemon_id) {
        Some(info) if info.user_id.as_str() == identity.user_id || identity.is_admin => {
            supervisor.stop_daemon(&daemon_id).await;
            StatusCode::OK.into_response()
        }
        Some(_) => StatusCode::FORBIDDEN.into_response(),
        None if identity.is_admin => StatusCode::NOT_FOUND.into_response(),
        None => StatusCode::FORBIDDEN.into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct StopChatResponse {
    pub count: usize,
}

/// `POST /daemons/chat/{chat_id}/stop` — stops every daemon of the caller in
/// that chat (§6).
pub async fn stop_chat_daemons<C: Clock + 'static>(
    State(supervisor): State<Arc<DaemonSupervisor<C>>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(chat_id): Path<String>,
) -> Json<StopChatResponse> {
    let targets = supervisor.list_daemons(Some(&identity.user_id), Some(&chat_id));
    let mut count = 0;
    for daemon in targets {
        if daemon.status == DaemonStatus::Running && supervisor.stop_daemon(daemon.daemon_id.as_str()).await {
            count += 1;
        }
    }
    Json(StopChatResponse { count })
}

#[cfg(test)]
#[path = "management_tests.rs"]
mod tests;
