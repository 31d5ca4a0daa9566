// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

//! Tests for the public `run()` function.
//!
//! Commands that need a `.cashbox/` directory are covered by the command
//! tests and by the integration tests that run the binary.

use super::*;
use clap::Parser;
use clap_complete::Shell;
use yare::parameterized;

#[parameterized(
    bash = { Shell::Bash },
    zsh = { Shell::Zsh },
    fish = { Shell::Fish },
)]
fn test_run_completion(shell: Shell) {
    let cli = Cli {
        offline: false,
        command: Command::Completion { shell },
    };
    assert!(run(cli).is_ok());
}

#[test]
fn test_block_on_propagates_errors() {
    let result = block_on(async { Err(Error::NotInitialized) });
    assert!(matches!(result, Err(Error::NotInitialized)));
}

#[test]
fn test_block_on_runs_timers() {
    let result = block_on(async {
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        Ok(())
    });
    assert!(result.is_ok());
}

#[test]
fn test_cli_exported() {
    let cli = Cli::try_parse_from(["cashbox", "--offline", "queue", "clear", "--force"]).unwrap();
    assert!(cli.offline);
    assert!(matches!(
        cli.command,
        Command::Queue(QueueCommand::Clear { force: true })
    ));
}
