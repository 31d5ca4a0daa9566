// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merge pending and confirmed records into one view.
//!
//! Merge rules:
//! - pending records are listed first and always win a tie
//! - a confirmed record whose logical key `(timestamp, driver_id)` matches a
//!   pending record is the same transaction seen mid-sync and is dropped
//! - records sharing an id are dropped after the first occurrence
//! - the result is sorted by timestamp, newest first, with a stable sort so
//!   pending records stay ahead of confirmed ones at equal timestamps
//!
//! Merging is idempotent: merging a merged view with either input again
//! yields the same view.

use std::collections::HashSet;

use crate::transaction::{RecordId, Transaction};

/// Merges the pending queue with a remote listing.
pub fn merge_views(pending: Vec<Transaction>, confirmed: Vec<Transaction>) -> Vec<Transaction> {
    let mut merged = Vec::with_capacity(pending.len() + confirmed.len());
    let mut seen_ids: HashSet<RecordId> = HashSet::new();
    let mut pending_keys: HashSet<(i64, u32)> = HashSet::new();

    for mut tx in pending {
        if !pending_keys.insert(tx.key()) {
            continue;
        }
        if let Some(id) = &tx.id {
            seen_ids.insert(id.clone());
        }
        tx.is_pending = true;
        merged.push(tx);
    }

    for mut tx in confirmed {
        if pending_keys.contains(&tx.key()) {
            continue;
        }
        if let Some(id) = &tx.id {
            if !seen_ids.insert(id.clone()) {
                continue;
            }
        }
        tx.is_pending = false;
        merged.push(tx);
    }

    sort_newest_first(&mut merged);
    merged
}

/// Sorts by timestamp descending, keeping the relative order of ties.
pub fn sort_newest_first(records: &mut [Transaction]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
