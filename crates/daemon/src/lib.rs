// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Daemon Supervisor and Runner (§4.F, §4.G), plus the HTTP surfaces
//! built on top of them: the Tool Proxy Endpoint (§4.D) and the
//! daemon-management surface (§6).

#![cfg_attr(any(test, feature = "test-support"), allow(clippy::panic))]
#![cfg_attr(any(test, feature = "test-support"), allow(clippy::unwrap_used))]
#![cfg_attr(any(test, feature = "test-support"), allow(clippy::expect_used))]

pub mod error;
pub mod management;
pub mod proxy;
pub mod router;
pub mod runner;
pub mod supervisor;
pub mod ws;

pub use error::{DaemonError, ProxyError};
pub use management::CallerIdentity;
pub use router::{router, AppState};
pub use supervisor::{DaemonInfo, DaemonSupervisor, StartDaemonRequest};

#[cfg(any(test, feature = "test-support"))]
pub mod gateway_fixture;
