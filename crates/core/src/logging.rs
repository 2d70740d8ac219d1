// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup: `tracing` + `tracing-subscriber`'s `EnvFilter` behind one
//! `init_tracing` entry point. The hosting service's entry point calls it
//! once at startup; everything downstream (the `%daemon_id`/`%session_id`/
//! `%kernel_id` structured fields used throughout this core) is emitted
//! through the ordinary `tracing` macros regardless of whether this is ever
//! called, so tests never need it.

use tracing_subscriber::EnvFilter;

/// Install a stderr-only `tracing` subscriber honoring `RUST_LOG`,
/// defaulting to `info` when unset. Safe to call more than once per
/// process (later calls are a no-op): a hosting binary that embeds this
/// core alongside other crates with their own init attempt should not
/// abort on the second call.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
