// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Daemon Supervisor: tracks every live daemon, enforces the per-user
//! concurrency cap, and owns starting/stopping/listing them.
//!
//! The daemon table is a `parking_lot::Mutex`-guarded map, per the
//! preemptive-runtime guidance: critical sections here never hold the lock
//! across an `.await`. The supervisor is the sole writer of `status`
//! (besides the runner's own terminal transitions, which the background
//! task reports back through the same lock).

use crate::error::DaemonError;
use crate::runner::{self, ExecuteArgs};
use codemode_core::{ChatId, Clock, DaemonId, DaemonStatus, EventSink, MessageId, SessionId, UserId};
use codemode_kernel::KernelClient;
use codemode_registry::SessionRegistry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A point-in-time view of one daemon, returned by `list_daemons` (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonInfo {
    pub daemon_id: DaemonId,
    pub kernel_id: String,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub started_at: u64,
    pub status: DaemonStatus,
}

struct Entry {
    info: DaemonInfo,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Everything needed to start one background run.
pub struct StartDaemonRequest {
    pub base_url: String,
    pub code: String,
    pub token: Option<String>,
    pub password: Option<String>,
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub event_sink: Option<Arc<dyn EventSink>>,
    pub session_id: Option<SessionId>,
    pub max_runtime: Option<Duration>,
}

impl StartDaemonRequest {
    pub fn new(
        base_url: impl Into<String>,
        code: impl Into<String>,
        user_id: UserId,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            code: code.into(),
            token: None,
            password: None,
            user_id,
            chat_id,
            message_id,
            event_sink: None,
            session_id: None,
            max_runtime: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_max_runtime(mut self, max_runtime: Duration) -> Self {
        self.max_runtime = Some(max_runtime);
        self
    }
}

pub struct DaemonSupervisor<C: Clock = codemode_core::SystemClock> {
    table: Arc<Mutex<HashMap<String, Entry>>>,
    kernel_client: KernelClient,
    registry: Arc<SessionRegistry>,
    clock: C,
    default_max_runtime: Duration,
    max_daemons_per_user: usize,
}

impl<C: Clock + 'static> DaemonSupervisor<C> {
    pub fn new(registry: Arc<SessionRegistry>, clock: C, default_max_runtime: Duration, max_daemons_per_user: usize) -> Self {
        Self {
            table: Arc::new(Mutex::new(HashMap::new())),
            kernel_client: KernelClient::new(),
            registry,
            clock,
            default_max_runtime,
            max_daemons_per_user,
        }
    }

    fn running_count(&self, user_id: &str) -> usize {
        self.table
            .lock()
            .values()
            .filter(|e| e.info.user_id.as_str() == user_id && e.info.status == DaemonStatus::Running)
            .count()
    }

    /// Start a background run. Fails with `QuotaExceeded` before anything is
    /// created if the user is already at the per-user cap (§4.F).
    pub async fn start_daemon(&self, request: StartDaemonRequest) -> Result<DaemonId, DaemonError> {
        if self.running_count(request.user_id.as_str()) >= self.max_daemons_per_user {
            return Err(DaemonError::QuotaExceeded { limit: self.max_daemons_per_user });
        }

        let (kernel_handle, kernel_id) = self
            .kernel_client
            .create_kernel(&request.base_url, request.token.as_deref(), request.password.as_deref())
            .await?;
        let ws_target = self.kernel_client.build_ws_url(&kernel_handle, &kernel_id);

        let daemon_id = DaemonId::generate();
        let cancel = CancellationToken::new();
        let started_at = self.clock.epoch_seconds();

        let info = DaemonInfo {
            daemon_id: daemon_id.clone(),
            kernel_id: kernel_id.clone(),
            user_id: request.user_id,
            chat_id: request.chat_id.clone(),
            message_id: request.message_id.clone(),
            started_at,
            status: DaemonStatus::Running,
        };

        let table = Arc::clone(&self.table);
        let kernel_client = self.kernel_client.clone();
        let registry = Arc::clone(&self.registry);
        let clock = self.clock.clone();
        let max_runtime = request.max_runtime.unwrap_or(self.default_max_runtime);
        let task_daemon_id = daemon_id.clone();
        let task_chat_id = request.chat_id;
        let task_message_id = request.message_id;
        let task_session_id = request.session_id;
        let task_code = request.code;
        let task_cancel = cancel.clone();
        let task_sink = request.event_sink;

        let task_handle = tokio::spawn(async move {
            let sink_ref: Option<&dyn EventSink> = task_sink.as_deref();
            let args = ExecuteArgs {
                kernel_handle,
                kernel_id: kernel_id.clone(),
                ws_target,
                code: task_code,
                kernel_session: task_daemon_id.as_str().to_string(),
                max_runtime,
                cancel: task_cancel,
                sink: sink_ref,
                daemon_id: task_daemon_id.clone(),
                chat_id: task_chat_id,
                message_id: task_message_id,
                session_id: task_session_id,
            };
            let (status, reason) = runner::execute(&kernel_client, &registry, &clock, args).await;
            tracing::info!(daemon_id = %task_daemon_id, ?status, reason, "daemon run finished");
            let mut table = table.lock();
            if let Some(entry) = table.get_mut(task_daemon_id.as_str()) {
                entry.info.status = status;
            }
            table.remove(task_daemon_id.as_str());
        });

        self.table.lock().insert(
            daemon_id.as_str().to_string(),
            Entry { info, cancel, handle: Some(task_handle) },
        );

        Ok(daemon_id)
    }

    /// Cancel a running daemon and wait for its cleanup to finish. Returns
    /// `false` if `daemon_id` is unknown; idempotent for already-terminal
    /// entries (§8 "`stop_daemon(d); stop_daemon(d)` ≡ `stop_daemon(d)`").
    pub async fn stop_daemon(&self, daemon_id: &str) -> bool {
        let handle = {
            let mut table = self.table.lock();
            match table.get_mut(daemon_id) {
                Some(entry) => {
                    if entry.info.status != DaemonStatus::Running {
                        return true;
                    }
                    entry.info.status = DaemonStatus::Stopped;
                    entry.cancel.cancel();
                    entry.handle.take()
                }
                None => return false,
            }
        };

        if let Some(handle) = handle {
            let _ = handle.await;
        }
        true
    }

    /// Snapshot one tracked daemon by id, if still present.
    pub fn info(&self, daemon_id: &str) -> Option<DaemonInfo> {
        self.table.lock().get(daemon_id).map(|e| e.info.clone())
    }

    /// Snapshot every tracked daemon, optionally filtered by owner and/or
    /// chat (§4.F; filters are ANDed when both are given).
    pub fn list_daemons(&self, user_id: Option<&str>, chat_id: Option<&str>) -> Vec<DaemonInfo> {
        self.table
            .lock()
            .values()
            .map(|e| e.info.clone())
            .filter(|info| user_id.map(|u| info.user_id.as_str() == u).unwrap_or(true))
            .filter(|info| chat_id.map(|c| info.chat_id.as_str() == c).unwrap_or(true))
            .collect()
    }

    /// Stop every running daemon owned by `user_id`, returning how many
    /// were stopped (§4.F, the logout/disconnect hook).
    pub async fn cleanup_user_daemons(&self, user_id: &str) -> usize {
        let ids: Vec<String> = self
            .table
            .lock()
            .values()
            .filter(|e| e.info.user_id.as_str() == user_id && e.info.status == DaemonStatus::Running)
            .map(|e| e.info.daemon_id.as_str().to_string())
            .collect();

        let mut stopped = 0;
        for id in ids {
            if self.stop_daemon(&id).await {
                stopped += 1;
            }
        }
        stopped
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
