// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared primitives for the Code Mode daemon subsystem: identifiers, the
//! clock abstraction, the daemon event model, the event sink trait, and
//! process configuration.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod event;
pub mod ids;
pub mod logging;
pub mod sink;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use event::{DaemonStatus, Event, OutputEvent, Stream, StatusEvent};
pub use ids::{ChatId, DaemonId, MessageId, SessionId, UserId};
pub use logging::init_tracing;
pub use sink::EventSink;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;

#[cfg(any(test, feature = "test-support"))]
pub use sink::FakeEventSink;
