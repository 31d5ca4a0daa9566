// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::NewTransaction;

/// Input defects in a new transaction. Never retried, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("negative order total")]
    NegativeOrderTotal,

    #[error("negative amount received")]
    NegativeAmountReceived,

    #[error("invalid driver id")]
    InvalidDriverId,
}

/// Inclusive range of valid driver ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRange {
    pub min: u32,
    pub max: u32,
}

impl DriverRange {
    pub fn new(min: u32, max: u32) -> Self {
        DriverRange { min, max }
    }

    pub fn contains(&self, driver_id: u32) -> bool {
        (self.min..=self.max).contains(&driver_id)
    }

    /// All valid ids, in order.
    pub fn ids(&self) -> impl Iterator<Item = u32> {
        self.min..=self.max
    }
}

impl Default for DriverRange {
    fn default() -> Self {
        DriverRange { min: 1, max: 6 }
    }
}

/// Check a new transaction against the domain rules.
///
/// Rules are checked in order and the first violation wins.
pub fn validate(tx: &NewTransaction, drivers: &DriverRange) -> Result<(), ValidationError> {
    if tx.order_total < Decimal::ZERO {
        return Err(ValidationError::NegativeOrderTotal);
    }
    if tx.amount_received < Decimal::ZERO {
        return Err(ValidationError::NegativeAmountReceived);
    }
    match tx.driver_id {
        Some(id) if drivers.contains(id) => Ok(()),
        _ => Err(ValidationError::InvalidDriverId),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
