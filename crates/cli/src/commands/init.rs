// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::{get_remote_path, init_work_dir, parse_driver_range, Config};
use crate::device;
use crate::error::Result;

pub fn run(remote: Option<String>, drivers: &str) -> Result<()> {
    let target_path = std::env::current_dir()?;
    run_impl(&target_path, remote, drivers, &mut std::io::stdout())
}

pub(crate) fn run_impl(
    target_path: &Path,
    remote: Option<String>,
    drivers: &str,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let drivers = parse_driver_range(drivers)?;
    let config = Config::new(drivers, remote)?;
    let work_dir = init_work_dir(target_path, &config)?;
    let device_id = device::load_or_create(&work_dir)?;

    writeln!(out, "Initialized cashbox at {}", work_dir.display())?;
    writeln!(out, "Drivers: {}-{}", drivers.min, drivers.max)?;
    match &config.remote {
        Some(remote) => writeln!(
            out,
            "Remote: {}",
            get_remote_path(&work_dir, remote).display()
        )?,
        None => writeln!(out, "Remote: none (transactions stay pending)")?,
    }
    writeln!(out, "Device: {}", device_id)?;
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
