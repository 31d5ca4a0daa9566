// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::{format_transaction, write_json, Session};
use crate::cli::{OutputFormat, QueueCommand};
use crate::error::{Error, Result};

pub fn run(offline: bool, command: QueueCommand) -> Result<()> {
    let session = Session::open_current(offline)?;
    run_impl(&session, command, &mut std::io::stdout())
}

pub(crate) fn run_impl(session: &Session, command: QueueCommand, out: &mut impl Write) -> Result<()> {
    match command {
        QueueCommand::List { output } => list(session, output, out),
        QueueCommand::Clear { force } => clear(session, force, out),
    }
}

fn list(session: &Session, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let pending = session.reconciler.queue().list()?;
    match output {
        OutputFormat::Json => write_json(out, &pending)?,
        OutputFormat::Text => {
            if pending.is_empty() {
                writeln!(out, "Queue is empty")?;
            }
            for tx in &pending {
                writeln!(out, "{}", format_transaction(tx))?;
            }
        }
    }
    Ok(())
}

/// Drops every pending record without syncing it.
fn clear(session: &Session, force: bool, out: &mut impl Write) -> Result<()> {
    let count = session.reconciler.pending_count()?;
    if !force {
        return Err(Error::InvalidInput(format!(
            "refusing to discard {} pending transaction(s) without --force",
            count
        )));
    }
    session.reconciler.queue().clear()?;
    tracing::info!(count, "pending queue cleared");
    writeln!(out, "Discarded {} pending transaction(s)", count)?;
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
