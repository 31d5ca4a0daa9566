// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::Session;
use crate::config::get_log_path;
use crate::device;
use crate::error::Result;
use crate::logging;
use crate::sync::{spawn_probe_task, SyncRunner};

pub async fn run(offline: bool) -> Result<()> {
    let session = Session::open_current(offline)?;
    logging::init_file(&get_log_path(&session.work_dir), "info");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for Ctrl-C: {}", e);
        }
    };
    run_impl(&session, shutdown, &mut std::io::stdout()).await
}

/// Probe the remote store periodically and let the sync runner flush the
/// queue whenever it comes back, until `shutdown` resolves.
pub(crate) async fn run_impl(
    session: &Session,
    shutdown: impl Future<Output = ()>,
    out: &mut impl Write,
) -> Result<()> {
    let settings = &session.config.sync;
    let device_id = device::load_or_create(&session.work_dir)?;
    let pending = session.reconciler.pending_count()?;
    writeln!(
        out,
        "Watching for connectivity ({} pending) as device {}. Press Ctrl-C to stop.",
        pending, device_id
    )?;
    out.flush()?;
    let cancel_token = CancellationToken::new();

    let probe_task = spawn_probe_task(
        session.monitor().clone(),
        session.reconciler.gateway().clone(),
        settings.probe_interval(),
        cancel_token.clone(),
    );
    let (runner, handle) = SyncRunner::new(
        Arc::clone(&session.reconciler),
        settings.runner_config(),
    );
    let runner_task = tokio::spawn(runner.run());

    tracing::info!(
        device = %device_id,
        work_dir = %session.work_dir.display(),
        "watch started"
    );

    shutdown.await;

    tracing::info!("watch stopping");
    cancel_token.cancel();
    handle.shutdown().await;
    if let Err(e) = probe_task.await {
        tracing::warn!("probe task ended abnormally: {}", e);
    }
    if let Err(e) = runner_task.await {
        tracing::warn!("sync runner ended abnormally: {}", e);
    }

    writeln!(out, "Stopped ({} pending).", session.reconciler.pending_count()?)?;
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
