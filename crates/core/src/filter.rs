// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Predicates over transaction records.
//!
//! The same filter is applied to pending and confirmed records so that
//! counts and totals agree regardless of connectivity.

use chrono::NaiveDate;

use crate::transaction::Transaction;

/// Date range and driver constraints. Empty fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive lower bound on the logical date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the logical date.
    pub date_to: Option<NaiveDate>,
    pub driver_id: Option<u32>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn on_date(date: NaiveDate) -> Self {
        TransactionFilter { date_from: Some(date), date_to: Some(date), driver_id: None }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        TransactionFilter { date_from: Some(from), date_to: Some(to), driver_id: None }
    }

    pub fn for_driver(driver_id: u32) -> Self {
        TransactionFilter { driver_id: Some(driver_id), ..Self::default() }
    }

    pub fn with_driver(mut self, driver_id: u32) -> Self {
        self.driver_id = Some(driver_id);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.date_from.is_some_and(|from| tx.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| tx.date > to) {
            return false;
        }
        if self.driver_id.is_some_and(|id| tx.driver_id != id) {
            return false;
        }
        true
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
