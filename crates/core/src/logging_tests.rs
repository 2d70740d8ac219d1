// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn init_tracing_does_not_panic_when_called_repeatedly() {
    init_tracing();
    init_tracing();
}
