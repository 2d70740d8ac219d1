// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel Client (§4.A): authenticate with a kernel gateway, create/destroy
//! a kernel, and build the channels WebSocket URL a Daemon Runner connects
//! to. This crate never opens the WebSocket itself — that is owned by the
//! runner (§4.G), which is the sole place cancellation-safe cleanup lives.

pub mod auth;
pub mod client;
pub mod error;

pub use client::{KernelClient, KernelHandle, WsTarget};
pub use error::KernelError;
