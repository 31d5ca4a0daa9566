// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cb_core::NewTransaction;

use super::{format_transaction, write_json, Session};
use crate::cli::OutputFormat;
use crate::error::Result;

pub async fn run(offline: bool, input: NewTransaction, output: OutputFormat) -> Result<()> {
    let session = Session::open_current(offline)?;
    session.probe().await;
    run_impl(&session, input, output, &mut std::io::stdout()).await
}

pub(crate) async fn run_impl(
    session: &Session,
    input: NewTransaction,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let tx = session.reconciler.add_transaction(input).await?;

    match output {
        OutputFormat::Json => write_json(out, &tx)?,
        OutputFormat::Text => {
            writeln!(out, "{}", format_transaction(&tx))?;
            if tx.is_pending {
                writeln!(
                    out,
                    "Saved locally; it will be synced when the remote store is reachable."
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "add_tests.rs"]
mod tests;
