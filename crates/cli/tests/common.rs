// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The binary with the environment overrides cleared.
pub fn cashbox() -> Command {
    let mut cmd = cargo_bin_cmd!("cashbox");
    cmd.env_remove("CASHBOX_OFFLINE")
        .env_remove("CASHBOX_REMOTE")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create an initialized temp directory with a remote collection
/// at `remote.db` next to `.cashbox/`.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    cashbox()
        .args(["init", "--remote", "remote.db"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory with no remote.
pub fn init_temp_detached() -> TempDir {
    let temp = TempDir::new().unwrap();
    cashbox()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Record a transaction and return stdout.
pub fn add(temp: &TempDir, driver: &str, total: &str, received: &str, offline: bool) -> String {
    let mut cmd = cashbox();
    cmd.args(["add", "-d", driver, "-t", total, "-r", received]);
    if offline {
        cmd.arg("--offline");
    }
    let output = cmd.current_dir(temp.path()).output().unwrap();
    assert!(output.status.success(), "add failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Number of pending transactions according to `cashbox status`.
pub fn pending_count(temp: &TempDir) -> usize {
    let output = cashbox()
        .args(["status", "--offline"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.strip_prefix("Pending: "))
        .and_then(|n| n.trim().parse().ok())
        .unwrap()
}
