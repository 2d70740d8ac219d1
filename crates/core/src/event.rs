// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event model emitted to a caller's sink (§3 Event, §6 event-sink contract).

use crate::ids::{ChatId, DaemonId, MessageId};
use serde::{Deserialize, Serialize};

/// Which stream a chunk of kernel output arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Terminal (and initial `running`) status of a daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonStatus {
    Running,
    Stopped,
    Error,
    Completed,
}

impl DaemonStatus {
    /// Once a daemon leaves `Running` it never returns (§3 invariant).
    pub fn is_terminal(self) -> bool {
        !matches!(self, DaemonStatus::Running)
    }
}

/// `{daemon_id, chat_id, message_id, stream, content, timestamp}` (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEvent {
    pub daemon_id: DaemonId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub stream: Stream,
    pub content: String,
    pub timestamp: u64,
}

/// `{daemon_id, chat_id, message_id, status, reason}` (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub daemon_id: DaemonId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub status: DaemonStatus,
    pub reason: String,
}

/// An envelope handed to the event sink, shaped `{type, data}` per §6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    #[serde(rename = "daemon:output")]
    Output(OutputEvent),
    #[serde(rename = "daemon:status")]
    Status(StatusEvent),
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
