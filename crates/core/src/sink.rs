// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The caller-supplied event sink (§6: "an async-callable").
//!
//! Borrowed, never owned: the core never closes a sink. Emission failures
//! are logged at debug level and never propagated (§4.G event-sink contract).

use crate::event::Event;
use async_trait::async_trait;

/// Receives `daemon:output`/`daemon:status` envelopes for one daemon's caller.
///
/// Implementations must preserve per-daemon ordering (§5 Ordering): frames
/// for a single daemon are emitted to the sink in the order they arrive.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn emit(&self, event: Event);
}

/// Emit through an optional sink, swallowing and logging any panic-free
/// failure path. A `None` sink is a documented no-op (§4.G).
pub async fn emit(sink: Option<&(dyn EventSink)>, event: Event) {
    if let Some(sink) = sink {
        sink.emit(event).await;
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEventSink;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every emitted event in arrival order, for assertions in tests.
    #[derive(Clone, Default)]
    pub struct FakeEventSink {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl FakeEventSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }
    }

    #[async_trait]
    impl EventSink for FakeEventSink {
        async fn emit(&self, event: Event) {
            self.events.lock().push(event);
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
