// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cb_core::Transaction;
use serde::Serialize;

use super::{write_json, Session};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{SyncReport, SyncStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView<'a> {
    status: &'static str,
    succeeded: usize,
    failed: usize,
    failures: Vec<FailureView<'a>>,
}

#[derive(Serialize)]
struct FailureView<'a> {
    record: &'a Transaction,
    error: String,
}

fn status_label(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Completed => "completed",
        SyncStatus::Offline => "offline",
        SyncStatus::Empty => "empty",
        SyncStatus::AlreadySyncing => "already_syncing",
    }
}

pub async fn run(offline: bool, output: OutputFormat) -> Result<()> {
    let session = Session::open_current(offline)?;
    session.probe().await;
    run_impl(&session, output, &mut std::io::stdout()).await
}

/// Failed records are reported, not raised: the command succeeds as long as
/// the queue itself could be read and updated.
pub(crate) async fn run_impl(
    session: &Session,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let report = session.reconciler.sync_pending_transactions().await?;

    match output {
        OutputFormat::Json => {
            let view = ReportView {
                status: status_label(report.status),
                succeeded: report.succeeded,
                failed: report.failed,
                failures: report
                    .failures
                    .iter()
                    .map(|f| FailureView {
                        record: &f.record,
                        error: f.error.to_string(),
                    })
                    .collect(),
            };
            write_json(out, &view)?;
        }
        OutputFormat::Text => print_text(session, &report, out)?,
    }
    Ok(())
}

fn print_text(session: &Session, report: &SyncReport, out: &mut impl Write) -> Result<()> {
    match report.status {
        SyncStatus::Offline => {
            let pending = session.reconciler.pending_count()?;
            writeln!(
                out,
                "Offline: {} transaction(s) pending, not synced",
                pending
            )?;
        }
        SyncStatus::Empty => writeln!(out, "Nothing to sync")?,
        SyncStatus::AlreadySyncing => writeln!(out, "A sync is already in progress")?,
        SyncStatus::Completed => {
            writeln!(out, "Synced {} transaction(s)", report.succeeded)?;
            for failure in &report.failures {
                let id = failure
                    .record
                    .id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(out, "  failed {}: {}", id, failure.error)?;
            }
            if report.failed > 0 {
                writeln!(
                    out,
                    "{} transaction(s) still pending; run 'cashbox sync' to retry",
                    report.failed
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
