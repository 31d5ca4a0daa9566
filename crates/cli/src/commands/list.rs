// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cb_core::{Transaction, TransactionFilter};

use super::{format_transaction, write_json, Session};
use crate::cli::OutputFormat;
use crate::error::Result;

pub async fn run(
    offline: bool,
    filter: TransactionFilter,
    remote: bool,
    output: OutputFormat,
) -> Result<()> {
    let session = Session::open_current(offline)?;
    session.probe().await;
    run_impl(&session, &filter, remote, output, &mut std::io::stdout()).await
}

pub(crate) async fn run_impl(
    session: &Session,
    filter: &TransactionFilter,
    remote: bool,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let records = if remote {
        session.reconciler.fetch_remote(filter).await?
    } else {
        session.reconciler.get_transactions(filter).await?
    };

    match output {
        OutputFormat::Json => write_json(out, &records)?,
        OutputFormat::Text => print_text(&records, out)?,
    }
    Ok(())
}

fn print_text(records: &[Transaction], out: &mut impl Write) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "No transactions")?;
        return Ok(());
    }
    for tx in records {
        writeln!(out, "{}", format_transaction(tx))?;
    }
    let pending = records.iter().filter(|tx| tx.is_pending).count();
    writeln!(out)?;
    if pending > 0 {
        writeln!(out, "{} transaction(s), {} pending", records.len(), pending)?;
    } else {
        writeln!(out, "{} transaction(s)", records.len())?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
