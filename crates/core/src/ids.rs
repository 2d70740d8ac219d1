// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque identifier newtypes threaded through the daemon subsystem.
//!
//! `UserId`/`ChatId`/`MessageId` are routing keys handed to us by the caller
//! (§3: "opaque routing keys") — we never parse or validate their contents.
//! `DaemonId` and `SessionId` are generated here with `nanoid`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! opaque_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(UserId, "Owner of daemons and code-mode sessions.");
opaque_id!(ChatId, "Chat that a daemon's output belongs to.");
opaque_id!(MessageId, "Originating chat message a daemon is attached to.");
opaque_id!(SessionId, "Registry key for a code-mode (tool-binding) session.");

/// Unique identifier for a background daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DaemonId(pub String);

impl DaemonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random daemon id.
    pub fn generate() -> Self {
        Self(nanoid::nanoid!())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DaemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DaemonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for DaemonId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl SessionId {
    /// Generate a fresh random code-mode session id.
    pub fn generate() -> Self {
        Self(nanoid::nanoid!())
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
