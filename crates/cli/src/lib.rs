// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cashbox - record driver cash transactions, online or offline.
//!
//! This crate provides the `cashbox` CLI. Each transaction is written to a
//! remote collection when it is reachable and kept in a durable local queue
//! when it is not; queued transactions are pushed later by `cashbox sync` or
//! by the long-running `cashbox watch`.
//!
//! # Main Components
//!
//! - [`Reconciler`] - Records transactions, merges pending and confirmed views, syncs the queue
//! - [`PendingQueue`] - Durable queue of transactions not yet confirmed
//! - [`ConnectivityMonitor`] - Observable online/offline state
//! - [`SyncRunner`] - Debounced sync on reconnect, plus optional periodic sync
//! - [`Config`] - Project configuration (driver range, remote path, sync tuning)
//! - [`Error`] - Error types for all operations
//!
//! # Initialization
//!
//! Use [`init_work_dir`] to create a new `.cashbox/` directory:
//!
//! ```rust,ignore
//! use cashbox::{init_work_dir, find_work_dir, Config};
//!
//! let config = Config::new(DriverRange::default(), Some("cash.db".into()))?;
//! let work_dir = init_work_dir(Path::new("."), &config)?;
//!
//! // Later
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! ```

mod cli;
mod commands;
mod device;
mod env;
mod logging;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, DateArgs, OutputFormat, QueueCommand};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, ErrorKind, Result, TransactionError};
pub use sync::{
    ConnectivityMonitor, ConnectivityStatus, PendingQueue, Reconciler, SyncReport, SyncRunner,
};

use clap::CommandFactory;
use clap_complete::generate;

use cb_core::NewTransaction;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let offline = cli.offline;
    if !matches!(cli.command, Command::Watch | Command::Completion { .. }) {
        logging::init_stderr("warn");
    }

    match cli.command {
        Command::Init { remote, drivers } => commands::init::run(remote, &drivers),
        Command::Add {
            driver,
            total,
            received,
            date,
            output,
        } => {
            let mut input = NewTransaction::new(driver, total, received);
            if let Some(day) = date {
                input = input.on(day);
            }
            block_on(commands::add::run(offline, input, output))
        }
        Command::List {
            dates,
            driver,
            remote,
            output,
        } => {
            let mut filter = dates.filter();
            if let Some(driver_id) = driver {
                filter = filter.with_driver(driver_id);
            }
            block_on(commands::list::run(offline, filter, remote, output))
        }
        Command::Sync { output } => block_on(commands::sync::run(offline, output)),
        Command::Status => block_on(commands::status::run(offline)),
        Command::Summary { dates, output } => {
            block_on(commands::summary::run(offline, dates.filter(), output))
        }
        Command::Queue(command) => commands::queue::run(offline, command),
        Command::Watch => block_on(commands::watch::run(offline)),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "cashbox", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// One-shot commands run on a current-thread runtime; `watch` spawns its
/// probe and sync tasks onto it too.
fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    rt.block_on(future)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
