// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-driver totals over a list of records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::transaction::Transaction;

/// Totals for one driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub driver_id: u32,
    pub total_transactions: usize,
    /// Sum of order totals.
    pub total_amount: Decimal,
    pub total_change: Decimal,
    /// How many of the counted records are still pending.
    pub pending_transactions: usize,
}

impl DriverSummary {
    fn empty(driver_id: u32) -> Self {
        DriverSummary {
            driver_id,
            total_transactions: 0,
            total_amount: Decimal::ZERO,
            total_change: Decimal::ZERO,
            pending_transactions: 0,
        }
    }
}

/// Summarizes records by driver, ordered by driver id.
pub fn summarize(records: &[Transaction]) -> Vec<DriverSummary> {
    let mut by_driver: BTreeMap<u32, DriverSummary> = BTreeMap::new();
    for tx in records {
        let entry = by_driver
            .entry(tx.driver_id)
            .or_insert_with(|| DriverSummary::empty(tx.driver_id));
        entry.total_transactions += 1;
        entry.total_amount += tx.order_total;
        entry.total_change += tx.change_amount;
        if tx.is_pending {
            entry.pending_transactions += 1;
        }
    }
    by_driver.into_values().collect()
}

/// Sum of order totals across all drivers.
pub fn grand_total(summaries: &[DriverSummary]) -> Decimal {
    summaries.iter().map(|s| s.total_amount).sum()
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
