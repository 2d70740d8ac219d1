// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SessionRegistry`: register / unregister / lookup (§4.C).

use crate::catalog::CatalogEntry;
use codemode_core::{SessionId, UserId};
use codemode_mcp::ToolClient;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A registry entry bundling tool-client handles and a tool catalog (§3).
///
/// The registry owns references, not exclusive ownership — tearing a
/// session down does not disconnect Tool Clients owned elsewhere (§4.C
/// invariant).
pub struct Session {
    pub session_id: SessionId,
    pub owner_user_id: UserId,
    pub tool_clients: HashMap<String, Arc<dyn ToolClient>>,
    pub tool_catalog: HashMap<String, CatalogEntry>,
}

/// The per-user side mapping used by callers that bypass in-chat setup but
/// still need binding text (§4.C, §10 supplemented features).
#[derive(Clone)]
pub struct UserBindingEntry {
    pub bindings: String,
    pub session_id: SessionId,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
    user_bindings: Mutex<HashMap<String, UserBindingEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        session_id: SessionId,
        owner_user_id: UserId,
        tool_clients: HashMap<String, Arc<dyn ToolClient>>,
        tool_catalog: HashMap<String, CatalogEntry>,
    ) {
        let key = session_id.as_str().to_string();
        let tool_count = tool_catalog.len();
        let session = Session { session_id, owner_user_id, tool_clients, tool_catalog };
        self.sessions.lock().insert(key.clone(), Arc::new(session));
        tracing::debug!(session_id = %key, tool_count, "registered code-mode session");
    }

    /// Idempotent: unregistering an unknown or already-removed id is a no-op
    /// (§4.C).
    pub fn unregister(&self, session_id: &str) {
        if self.sessions.lock().remove(session_id).is_some() {
            tracing::debug!(%session_id, "unregistered code-mode session");
        }
    }

    pub fn lookup(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.lock().get(session_id).cloned()
    }

    pub fn is_registered(&self, session_id: &str) -> bool {
        self.sessions.lock().contains_key(session_id)
    }

    pub fn store_user_bindings(&self, user_id: &str, bindings: String, session_id: SessionId) {
        self.user_bindings.lock().insert(user_id.to_string(), UserBindingEntry { bindings, session_id });
    }

    /// Returns the stored bindings only if the referenced session is still
    /// registered; otherwise empty (§4.C).
    pub fn get_user_bindings(&self, user_id: &str) -> String {
        let Some(entry) = self.user_bindings.lock().get(user_id).cloned() else {
            return String::new();
        };
        if self.is_registered(entry.session_id.as_str()) {
            entry.bindings
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
