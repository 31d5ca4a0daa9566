// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction records and their identities.
//!
//! A record carries one of two kinds of id:
//! - `pending_<timestamp>`: assigned locally while the record sits in the
//!   pending queue
//! - anything else: assigned by the remote store on confirmation
//!
//! The `pending_` prefix is reserved, so the two id spaces never collide.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate::{validate, DriverRange, ValidationError};

/// Prefix reserved for locally assigned ids.
pub const PENDING_ID_PREFIX: &str = "pending_";

/// Identifier of a transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Synthetic id for a record that only exists in the pending queue.
    pub fn pending(timestamp: i64) -> Self {
        RecordId(format!("{PENDING_ID_PREFIX}{timestamp}"))
    }

    /// Id assigned by the remote store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedId`] if the id uses the pending prefix and
    /// [`Error::InvalidInput`] if it is empty.
    pub fn remote(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidInput("remote id cannot be empty".to_string()));
        }
        if id.starts_with(PENDING_ID_PREFIX) {
            return Err(Error::ReservedId(id));
        }
        Ok(RecordId(id))
    }

    /// Returns true for locally assigned ids.
    pub fn is_pending(&self) -> bool {
        self.0.starts_with(PENDING_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller input for a new transaction, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub driver_id: Option<u32>,
    pub order_total: Decimal,
    pub amount_received: Decimal,
    /// Logical day of the transaction. Defaults to the clock's current day.
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    pub fn new(driver_id: u32, order_total: Decimal, amount_received: Decimal) -> Self {
        NewTransaction { driver_id: Some(driver_id), order_total, amount_received, date: None }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Validates the input and builds the record.
    ///
    /// The change amount is computed here, once, and stored.
    pub fn into_record(
        self,
        drivers: &DriverRange,
        today: NaiveDate,
        timestamp: i64,
    ) -> std::result::Result<Transaction, ValidationError> {
        validate(&self, drivers)?;
        let driver_id = self.driver_id.ok_or(ValidationError::InvalidDriverId)?;
        Ok(Transaction {
            id: None,
            driver_id,
            order_total: self.order_total,
            amount_received: self.amount_received,
            change_amount: self.amount_received - self.order_total,
            date: self.date.unwrap_or(today),
            timestamp,
            is_pending: false,
        })
    }
}

/// A recorded transaction, either pending or confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Absent only for records persisted before ids were assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub driver_id: u32,
    pub order_total: Decimal,
    pub amount_received: Decimal,
    pub change_amount: Decimal,
    pub date: NaiveDate,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub is_pending: bool,
}

impl Transaction {
    /// Logical identity shared by the pending and confirmed copies of a record.
    pub fn key(&self) -> (i64, u32) {
        (self.timestamp, self.driver_id)
    }

    /// Marks the record pending and gives it a synthetic id if it has none.
    pub fn into_pending(mut self) -> Self {
        if self.id.is_none() {
            self.id = Some(RecordId::pending(self.timestamp));
        }
        self.is_pending = true;
        self
    }

    /// Marks the record confirmed under the given remote id.
    pub fn into_confirmed(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self.is_pending = false;
        self
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
