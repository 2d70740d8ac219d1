// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binding Generator (§4.E): turns a tool catalog into Python source text
//! that defines `mcp_tools`, the object the in-kernel user code calls.

pub mod error;
pub mod generator;

pub use error::BindingError;
pub use generator::{generate_bindings, type_label};
