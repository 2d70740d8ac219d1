// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel Client error taxonomy (§7): `AuthError` on credential failure,
//! `UpstreamError` on a non-2xx kernel-gateway response.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("kernel gateway login rejected: {0}")]
    Auth(String),

    #[error("kernel gateway returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("kernel gateway request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for KernelError {
    fn from(err: reqwest::Error) -> Self {
        KernelError::Transport(err.to_string())
    }
}
