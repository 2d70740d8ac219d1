// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_matches_documented_defaults() {
    let config = Config::default();
    assert_eq!(config.max_daemons_per_user, DEFAULT_MAX_DAEMONS_PER_USER);
    assert_eq!(config.default_max_runtime, Duration::from_secs(DEFAULT_MAX_RUNTIME_SECS));
}

#[test]
fn from_env_rejects_non_numeric_max_runtime() {
    // SAFETY-equivalent: single-threaded w.r.t. this var within this test.
    std::env::set_var("CODEMODE_MAX_RUNTIME_SECS", "not-a-number");
    let result = Config::from_env();
    std::env::remove_var("CODEMODE_MAX_RUNTIME_SECS");
    assert!(matches!(result, Err(ConfigError::InvalidValue { name: "CODEMODE_MAX_RUNTIME_SECS", .. })));
}
