// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Registry (§4.C): a process-wide mapping from session id to
//! `{owning user, tool-client handles, tool catalog}`, plus the per-user
//! bindings cache the spec's expansion adds (§4.C, §10 supplemented
//! features) so a direct code-execution path can still fetch the most
//! recently generated binding text for a user.
//!
//! Process-global mutable state (§9 Design Notes): on this preemptive
//! (multi-threaded tokio) runtime both tables are guarded by `parking_lot`
//! mutexes, per §5's instruction for preemptive runtimes.

pub mod catalog;
pub mod session;

pub use catalog::{CatalogEntry, InvokeError, ToolClientInvoker, ToolInvoker};
pub use session::{Session, SessionRegistry, UserBindingEntry};
