// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns `true` if `CASHBOX_OFFLINE=1`.
pub fn force_offline() -> bool {
    std::env::var(vars::CASHBOX_OFFLINE).is_ok_and(|v| v == "1")
}

/// Returns the value of `CASHBOX_REMOTE` if set, overriding the configured
/// remote collection path.
pub fn remote_override() -> Option<PathBuf> {
    std::env::var(vars::CASHBOX_REMOTE)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
