// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-installation device identity, stored in `.cashbox/device_id`.

use std::fs;
use std::path::Path;

use chrono::Utc;

use cb_core::id::generate_device_id;

use crate::error::Result;

const DEVICE_ID_FILE_NAME: &str = "device_id";

/// Read the device id, creating it on first use.
pub fn load_or_create(work_dir: &Path) -> Result<String> {
    let path = work_dir.join(DEVICE_ID_FILE_NAME);
    if let Ok(existing) = fs::read_to_string(&path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return Ok(existing.to_string());
        }
    }

    let id = generate_device_id(&Utc::now());
    fs::write(&path, format!("{}\n", id))?;
    tracing::debug!(device_id = %id, "created device id");
    Ok(id)
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
