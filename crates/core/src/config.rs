// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration: a small typed struct loaded from environment
//! variables, one free-standing lookup per setting rather than a general
//! config-file parser (configuration loading beyond the daemon subsystem's
//! own knobs is a surrounding-service concern).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Per-user concurrent-running-daemon cap (§3 invariant, §5 resource policy).
pub const DEFAULT_MAX_DAEMONS_PER_USER: usize = 3;

/// Whole-run deadline default (§5 Timeouts).
pub const DEFAULT_MAX_RUNTIME_SECS: u64 = 3600;

/// Per-frame soft receive timeout (§5 Timeouts).
pub const FRAME_RECV_TIMEOUT: Duration = Duration::from_secs(30);

/// Kernel-create RPC ceiling (§5 Timeouts).
pub const KERNEL_INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP tool-call default timeout (§5 Timeouts).
pub const TOOL_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default bind address for the tool-proxy/daemon-management HTTP surface,
/// built from fixed octets so constructing it can never fail.
const DEFAULT_HTTP_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8800);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Process-wide configuration for the daemon subsystem.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the kernel gateway (§4.A).
    pub kernel_gateway_url: String,
    /// Default `max_runtime` for a daemon that doesn't override it (§4.F).
    pub default_max_runtime: Duration,
    /// Per-user running-daemon cap (§3). Overridable for load testing.
    pub max_daemons_per_user: usize,
    /// Bind address for the tool-proxy/daemon-management HTTP surface (§6).
    pub http_bind_addr: SocketAddr,
}

impl Config {
    /// Load from environment variables, typed defaults for anything unset.
    ///
    /// - `CODEMODE_KERNEL_GATEWAY_URL` (default `http://127.0.0.1:8888/`)
    /// - `CODEMODE_MAX_RUNTIME_SECS` (default 3600)
    /// - `CODEMODE_MAX_DAEMONS_PER_USER` (default 3)
    /// - `CODEMODE_HTTP_BIND_ADDR` (default `127.0.0.1:8800`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let kernel_gateway_url = std::env::var("CODEMODE_KERNEL_GATEWAY_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8888/".to_string());

        let default_max_runtime = match std::env::var("CODEMODE_MAX_RUNTIME_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue { name: "CODEMODE_MAX_RUNTIME_SECS", value: raw.clone() }
            })?),
            Err(_) => Duration::from_secs(DEFAULT_MAX_RUNTIME_SECS),
        };

        let max_daemons_per_user = match std::env::var("CODEMODE_MAX_DAEMONS_PER_USER") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                name: "CODEMODE_MAX_DAEMONS_PER_USER",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_MAX_DAEMONS_PER_USER,
        };

        let http_bind_addr = match std::env::var("CODEMODE_HTTP_BIND_ADDR") {
            Ok(raw) => raw.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidValue {
                name: "CODEMODE_HTTP_BIND_ADDR",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_HTTP_BIND_ADDR,
        };

        Ok(Self { kernel_gateway_url, default_max_runtime, max_daemons_per_user, http_bind_addr })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kernel_gateway_url: "http://127.0.0.1:8888/".to_string(),
            default_max_runtime: Duration::from_secs(DEFAULT_MAX_RUNTIME_SECS),
            max_daemons_per_user: DEFAULT_MAX_DAEMONS_PER_USER,
            http_bind_addr: DEFAULT_HTTP_BIND_ADDR,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
