// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::Session;
use crate::device;
use crate::error::Result;

pub async fn run(offline: bool) -> Result<()> {
    let session = Session::open_current(offline)?;
    session.probe().await;
    run_impl(&session, &mut std::io::stdout())
}

pub(crate) fn run_impl(session: &Session, out: &mut impl Write) -> Result<()> {
    let drivers = session.config.drivers;
    writeln!(out, "Connectivity: {}", session.monitor().status().label())?;
    match &session.remote_path {
        Some(path) => writeln!(out, "Remote: {}", path.display())?,
        None => writeln!(out, "Remote: none")?,
    }
    writeln!(out, "Drivers: {}-{}", drivers.min, drivers.max)?;
    writeln!(out, "Pending: {}", session.reconciler.pending_count()?)?;
    writeln!(out, "Device: {}", device::load_or_create(&session.work_dir)?)?;
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
