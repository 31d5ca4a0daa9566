// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cb_core::summary::grand_total;
use cb_core::{summarize, DriverSummary, TransactionFilter};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{money, write_json, Session};
use crate::cli::OutputFormat;
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView {
    drivers: Vec<DriverSummary>,
    grand_total: Decimal,
}

pub async fn run(offline: bool, filter: TransactionFilter, output: OutputFormat) -> Result<()> {
    let session = Session::open_current(offline)?;
    session.probe().await;
    run_impl(&session, &filter, output, &mut std::io::stdout()).await
}

/// Per-driver totals over the merged view, so pending records count too.
pub(crate) async fn run_impl(
    session: &Session,
    filter: &TransactionFilter,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let records = session.reconciler.get_transactions(filter).await?;
    let drivers = summarize(&records);
    let total = grand_total(&drivers);

    match output {
        OutputFormat::Json => write_json(
            out,
            &SummaryView {
                drivers,
                grand_total: total,
            },
        )?,
        OutputFormat::Text => {
            if drivers.is_empty() {
                writeln!(out, "No transactions")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:<8} {:>6} {:>12} {:>12} {:>8}",
                "DRIVER", "COUNT", "TOTAL", "CHANGE", "PENDING"
            )?;
            for s in &drivers {
                writeln!(
                    out,
                    "{:<8} {:>6} {:>12} {:>12} {:>8}",
                    s.driver_id,
                    s.total_transactions,
                    money(s.total_amount),
                    money(s.total_change),
                    s.pending_transactions
                )?;
            }
            writeln!(out)?;
            writeln!(out, "Grand total: {}", money(total))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
