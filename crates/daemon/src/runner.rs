// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Daemon Runner: one instance per daemon, owning a kernel session and
//! its channels WebSocket, classifying frames and emitting events until a
//! terminal status is reached.
//!
//! `run` is the pure receive-loop state machine, abstracted over a
//! `KernelSocket` so it can be driven in tests without a real WebSocket —
//! the same separation the kernel crate draws between building a `WsTarget`
//! and actually opening the socket. `execute` wraps `run` with the
//! guaranteed cleanup (kernel teardown, session unregister) that must run
//! on every exit path, mirroring the containerized adapter's
//! connect-then-bridge-then-cleanup shape.

use crate::error::DaemonError;
use async_trait::async_trait;
use codemode_core::{ChatId, Clock, DaemonId, DaemonStatus, EventSink, MessageId, Stream};
use codemode_kernel::{KernelClient, KernelHandle};
use codemode_registry::SessionRegistry;
use codemode_wire::kernel::{
    generate_msg_id, DisplayContent, ErrorContent, ExecuteRequest, KernelFrame, StatusContent, StreamContent,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Abstraction over the kernel channels WebSocket, so the receive loop in
/// `run` can be unit tested with a fake that never completes (to exercise
/// cancellation) or replays a fixed frame sequence (to exercise dispatch).
#[async_trait]
pub trait KernelSocket: Send {
    async fn send_execute_request(&mut self, request: &ExecuteRequest) -> Result<(), DaemonError>;

    /// Returns the next frame, or `None` once the stream has ended.
    /// Malformed frames are logged and skipped internally — they never
    /// reach the caller, matching the "protocol error: logged & skipped,
    /// not fatal" policy.
    async fn recv_frame(&mut self) -> Option<KernelFrame>;
}

fn stream_from_name(name: &str) -> Stream {
    if name == "stderr" {
        Stream::Stderr
    } else {
        Stream::Stdout
    }
}

async fn emit_output(sink: Option<&dyn EventSink>, daemon_id: &DaemonId, chat_id: &ChatId, message_id: &MessageId, stream: Stream, content: impl Into<String>, clock: &dyn Clock) {
    let content = content.into();
    if content.is_empty() {
        return;
    }
    codemode_core::sink::emit(
        sink,
        codemode_core::Event::Output(codemode_core::OutputEvent {
            daemon_id: daemon_id.clone(),
            chat_id: chat_id.clone(),
            message_id: message_id.clone(),
            stream,
            content,
            timestamp: clock.epoch_ms(),
        }),
    )
    .await;
}

async fn emit_status(sink: Option<&dyn EventSink>, daemon_id: &DaemonId, chat_id: &ChatId, message_id: &MessageId, status: DaemonStatus, reason: impl Into<String>) {
    codemode_core::sink::emit(
        sink,
        codemode_core::Event::Status(codemode_core::StatusEvent {
            daemon_id: daemon_id.clone(),
            chat_id: chat_id.clone(),
            message_id: message_id.clone(),
            status,
            reason: reason.into(),
        }),
    )
    .await;
}

/// Drive one daemon's kernel conversation to a terminal status.
///
/// Sends exactly one execute request, then loops receiving frames until a
/// terminal `msg_type` arrives, the whole-run deadline elapses, or `cancel`
/// is triggered. Returns the terminal status and a human-readable reason.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    socket: &mut dyn KernelSocket,
    clock: &dyn Clock,
    code: String,
    kernel_session: String,
    max_runtime: Duration,
    cancel: CancellationToken,
    sink: Option<&dyn EventSink>,
    daemon_id: &DaemonId,
    chat_id: &ChatId,
    message_id: &MessageId,
) -> (DaemonStatus, String) {
    let request = ExecuteRequest::new(code, generate_msg_id(), kernel_session);
    let msg_id = request.msg_id().to_string();

    if let Err(e) = socket.send_execute_request(&request).await {
        return (DaemonStatus::Error, e.to_string());
    }

    emit_status(sink, daemon_id, chat_id, message_id, DaemonStatus::Running, "Script started").await;

    let deadline = clock.now() + max_runtime;
    loop {
        let remaining = deadline.saturating_duration_since(clock.now());
        if remaining.is_zero() {
            emit_output(sink, daemon_id, chat_id, message_id, Stream::Stderr, "Maximum runtime exceeded", clock)
                .await;
            let reason = "max runtime exceeded";
            emit_status(sink, daemon_id, chat_id, message_id, DaemonStatus::Completed, reason).await;
            return (DaemonStatus::Completed, reason.to_string());
        }
        let soft_timeout = remaining.min(Duration::from_secs(30));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let reason = "Stopped by user";
                emit_status(sink, daemon_id, chat_id, message_id, DaemonStatus::Stopped, reason).await;
                return (DaemonStatus::Stopped, reason.to_string());
            }
            frame = socket.recv_frame() => {
                let Some(frame) = frame else {
                    let reason = "kernel connection closed unexpectedly";
                    emit_status(sink, daemon_id, chat_id, message_id, DaemonStatus::Error, reason).await;
                    return (DaemonStatus::Error, reason.to_string());
                };
                if !frame.answers(&msg_id) {
                    continue;
                }
                match dispatch_frame(sink, daemon_id, chat_id, message_id, &frame, clock).await {
                    Some(outcome) => return outcome,
                    None => continue,
                }
            }
            _ = tokio::time::sleep(soft_timeout) => {
                continue;
            }
        }
    }
}

/// Classify one matched frame. Returns `Some((status, reason))` when the
/// frame is terminal, `None` when the loop should continue.
async fn dispatch_frame(
    sink: Option<&dyn EventSink>,
    daemon_id: &DaemonId,
    chat_id: &ChatId,
    message_id: &MessageId,
    frame: &KernelFrame,
    clock: &dyn Clock,
) -> Option<(DaemonStatus, String)> {
    match frame.msg_type.as_str() {
        "stream" => {
            if let Ok(content) = serde_json::from_value::<StreamContent>(frame.content.clone()) {
                emit_output(sink, daemon_id, chat_id, message_id, stream_from_name(&content.name), content.text, clock)
                    .await;
            }
            None
        }
        "execute_result" | "display_data" => {
            if let Ok(content) = serde_json::from_value::<DisplayContent>(frame.content.clone()) {
                if let Some(text) = content.data.get("text/plain").and_then(|v| v.as_str()) {
                    emit_output(sink, daemon_id, chat_id, message_id, Stream::Stdout, text, clock).await;
                }
            }
            None
        }
        "error" => {
            let content: ErrorContent = serde_json::from_value(frame.content.clone()).unwrap_or_default();
            emit_output(sink, daemon_id, chat_id, message_id, Stream::Stderr, content.traceback.join("\n"), clock)
                .await;
            let reason = "Script raised an error";
            emit_status(sink, daemon_id, chat_id, message_id, DaemonStatus::Error, reason).await;
            Some((DaemonStatus::Error, reason.to_string()))
        }
        "status" => {
            let content: Option<StatusContent> = serde_json::from_value(frame.content.clone()).ok();
            if content.map(|c| c.execution_state == "idle").unwrap_or(false) {
                let reason = "Script finished";
                emit_status(sink, daemon_id, chat_id, message_id, DaemonStatus::Completed, reason).await;
                Some((DaemonStatus::Completed, reason.to_string()))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Arguments bundled to keep `execute`'s signature manageable; one per
/// daemon run, built by the supervisor right before spawning the task.
pub struct ExecuteArgs<'a> {
    pub kernel_handle: KernelHandle,
    pub kernel_id: String,
    pub ws_target: codemode_kernel::WsTarget,
    pub code: String,
    pub kernel_session: String,
    pub max_runtime: Duration,
    pub cancel: CancellationToken,
    pub sink: Option<&'a (dyn EventSink)>,
    pub daemon_id: DaemonId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub session_id: Option<codemode_core::SessionId>,
}

/// Open the real channels WebSocket, run the protocol loop, then run the
/// cleanup that must happen on every exit path: delete the kernel (best
/// effort), and unregister the bound session if one was provided. Kernel
/// deletion and session unregister errors are logged and swallowed — they
/// never change the returned status (§7 cleanup-errors policy).
pub async fn execute<C: Clock>(
    kernel_client: &KernelClient,
    registry: &SessionRegistry,
    clock: &C,
    args: ExecuteArgs<'_>,
) -> (DaemonStatus, String) {
    let outcome = match crate::ws::connect(&args.ws_target).await {
        Ok(mut socket) => {
            run(
                &mut socket,
                clock,
                args.code,
                args.kernel_session,
                args.max_runtime,
                args.cancel,
                args.sink,
                &args.daemon_id,
                &args.chat_id,
                &args.message_id,
            )
            .await
        }
        Err(e) => {
            let reason = e.to_string();
            emit_status(args.sink, &args.daemon_id, &args.chat_id, &args.message_id, DaemonStatus::Error, &reason)
                .await;
            (DaemonStatus::Error, reason)
        }
    };

    kernel_client.delete_kernel(&args.kernel_handle, &args.kernel_id).await;
    if let Some(session_id) = &args.session_id {
        registry.unregister(session_id.as_str());
    }

    outcome
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
