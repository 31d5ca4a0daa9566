// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::{parse_amount, parse_date, DateArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "cashbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record driver cash transactions, online or offline")]
#[command(
    long_about = "Record driver cash transactions, online or offline.\n\n\
    Transactions recorded while the remote store is unreachable are kept in a \
    local pending queue and synced when it comes back."
)]
pub struct Cli {
    /// Do not contact the remote store (same as CASHBOX_OFFLINE=1)
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize cashbox in the current directory
    #[command(after_help = "\
Examples:
  cashbox init                                Local-only, drivers 1-6
  cashbox init --remote /mnt/office/cash.db   Sync to a shared collection
  cashbox init --drivers 1-10                 Allow driver ids 1 through 10")]
    Init {
        /// Path of the remote collection, absolute or relative to this directory
        #[arg(long, value_name = "path")]
        remote: Option<String>,

        /// Valid driver ids, written MIN-MAX
        #[arg(long, value_name = "range", default_value = "1-6")]
        drivers: String,
    },

    /// Record a transaction
    #[command(after_help = "\
Examples:
  cashbox add --driver 2 --total 12.50 --received 20   Change is computed (7.50)
  cashbox add -d 3 -t 8 -r 10 --date 2026-03-01        Record against a given day")]
    Add {
        /// Driver id
        #[arg(short, long)]
        driver: u32,

        /// Order total
        #[arg(short, long, value_parser = parse_amount, allow_hyphen_values = true)]
        total: rust_decimal::Decimal,

        /// Amount received from the customer
        #[arg(short, long, value_parser = parse_amount, allow_hyphen_values = true)]
        received: rust_decimal::Decimal,

        /// Day the transaction belongs to (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<chrono::NaiveDate>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List transactions, pending first, newest first
    #[command(after_help = "\
Examples:
  cashbox list                                 Everything
  cashbox list --date 2026-03-01               One day
  cashbox list --from 2026-03-01 --to 2026-03-07 --driver 2
  cashbox list --remote                        Confirmed only, fail if unreachable")]
    List {
        #[command(flatten)]
        dates: DateArgs,

        /// Only this driver
        #[arg(long)]
        driver: Option<u32>,

        /// Read confirmed transactions from the remote store only
        #[arg(long)]
        remote: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Push pending transactions to the remote store
    Sync {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Show connectivity, pending count and remote store
    Status,

    /// Per-driver totals
    Summary {
        #[command(flatten)]
        dates: DateArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Inspect or reset the pending queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Stay running, syncing whenever the remote store becomes reachable
    Watch,

    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// List pending transactions in the order they were recorded
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Drop every pending transaction
    Clear {
        /// Required; pending transactions that were never synced are lost
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
