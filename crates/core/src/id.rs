// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Prefix for ids assigned by the remote collection.
pub const REMOTE_ID_PREFIX: &str = "tx";

/// Generate a remote id from driver, creation timestamp and insertion time.
/// Format: tx-{hash} where hash is first 8 hex chars of SHA256(driver + timestamp + inserted_at)
pub fn generate_id(driver_id: u32, timestamp: i64, inserted_at: &DateTime<Utc>) -> String {
    let input = format!("{}:{}:{}", driver_id, timestamp, inserted_at.to_rfc3339());
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    format!("{}-{}", REMOTE_ID_PREFIX, short_hash)
}

/// Generate a unique id, handling collisions by appending an incrementing suffix.
pub fn generate_unique_id<F>(
    driver_id: u32,
    timestamp: i64,
    inserted_at: &DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(driver_id, timestamp, inserted_at);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

/// Generate a random-looking device id from the current time and process id.
pub fn generate_device_id(now: &DateTime<Utc>) -> String {
    let input = format!(
        "{}:{}:{}",
        now.timestamp_nanos_opt().unwrap_or_default(),
        std::process::id(),
        std::env::temp_dir().display()
    );
    let hash = Sha256::digest(input.as_bytes());
    hex::encode(&hash[..8])
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
