// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.
//!
//! One-shot commands log warnings to stderr. `watch` logs at info level to
//! `.cashbox/cashbox.log`, falling back to stderr if the file cannot be
//! opened. `RUST_LOG` overrides the level either way.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::env::vars;

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(vars::RUST_LOG).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log to stderr at the given default level.
pub fn init_stderr(default_level: &str) {
    // A subscriber may already be installed (e.g. by tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a file at the given default level, or to stderr if it can't be opened.
pub fn init_file(log_path: &Path, default_level: &str) {
    match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(default_level))
                .with_writer(file)
                .with_ansi(false)
                .try_init();
        }
        Err(e) => {
            init_stderr(default_level);
            tracing::warn!("cannot open {}: {}, logging to stderr", log_path.display(), e);
        }
    }
}
