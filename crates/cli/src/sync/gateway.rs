// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed access to the remote store.
//!
//! The gateway translates between [`Transaction`] records and the store's
//! row schema and classifies store failures. It applies no business rules
//! and never touches the pending queue.

use std::sync::Arc;

use cb_core::{RecordId, RowQuery, Transaction, TransactionFilter, TransactionRow};
use chrono::NaiveDate;

use super::store::{RemoteStore, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error type for remote gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    /// The store could not be reached.
    #[error("remote store unreachable: {0}")]
    Unreachable(String),

    /// The store refused the operation.
    #[error("remote store rejected the operation: {0}")]
    Rejected(String),

    /// The store returned a row that does not form a valid record.
    #[error("invalid record from remote store: {0}")]
    InvalidRecord(String),
}

impl From<StoreError> for DatabaseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unreachable(msg) => DatabaseError::Unreachable(msg),
            StoreError::Rejected(msg) => DatabaseError::Rejected(msg),
        }
    }
}

/// Outcome of writing one record in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The record as submitted.
    pub record: Transaction,
    /// The confirmed record, or why it was not written.
    pub result: Result<Transaction, DatabaseError>,
}

/// Typed read/write operations against a [`RemoteStore`].
pub struct RemoteGateway<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for RemoteGateway<S> {
    fn clone(&self) -> Self {
        RemoteGateway {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RemoteStore + ?Sized> RemoteGateway<S> {
    pub fn new(store: Arc<S>) -> Self {
        RemoteGateway { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Insert one record and return it confirmed under the store's id.
    pub async fn write(&self, record: &Transaction) -> Result<Transaction, DatabaseError> {
        let row = self.store.insert_one(to_row(record)).await?;
        from_row(row)
    }

    /// Insert several records, reporting each outcome in input order.
    pub async fn write_batch(&self, records: &[Transaction]) -> Vec<WriteOutcome> {
        let rows = records.iter().map(to_row).collect();
        let mut results = self.store.insert_batch(rows).await.into_iter();
        records
            .iter()
            .map(|record| {
                let result = match results.next() {
                    Some(Ok(row)) => from_row(row),
                    Some(Err(e)) => Err(e.into()),
                    None => Err(DatabaseError::Rejected(
                        "store returned no outcome for record".to_string(),
                    )),
                };
                WriteOutcome {
                    record: record.clone(),
                    result,
                }
            })
            .collect()
    }

    /// Read confirmed records matching the filter, newest first.
    pub async fn read_all(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let rows = self.store.select(to_query(filter)).await?;
        let mut records = rows
            .into_iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()?;
        // Stores are required to order by timestamp, but don't trust them
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Check that the store is reachable.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(self.store.ping().await?)
    }
}

pub(crate) fn to_row(record: &Transaction) -> TransactionRow {
    TransactionRow {
        id: None,
        driver_id: i64::from(record.driver_id),
        order_total: record.order_total,
        amount_received: record.amount_received,
        change_amount: record.change_amount,
        date: record.date.format(DATE_FORMAT).to_string(),
        timestamp: record.timestamp,
    }
}

pub(crate) fn from_row(row: TransactionRow) -> Result<Transaction, DatabaseError> {
    let raw_id = row
        .id
        .ok_or_else(|| DatabaseError::InvalidRecord("row has no id".to_string()))?;
    let id = RecordId::remote(raw_id).map_err(|e| DatabaseError::InvalidRecord(e.to_string()))?;
    let driver_id = u32::try_from(row.driver_id).map_err(|_| {
        DatabaseError::InvalidRecord(format!("driver id {} out of range", row.driver_id))
    })?;
    let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
        .map_err(|e| DatabaseError::InvalidRecord(format!("bad date '{}': {}", row.date, e)))?;

    Ok(Transaction {
        id: Some(id),
        driver_id,
        order_total: row.order_total,
        amount_received: row.amount_received,
        change_amount: row.change_amount,
        date,
        timestamp: row.timestamp,
        is_pending: false,
    })
}

fn to_query(filter: &TransactionFilter) -> RowQuery {
    RowQuery {
        driver_id: filter.driver_id.map(i64::from),
        date_from: filter.date_from.map(|d| d.format(DATE_FORMAT).to_string()),
        date_to: filter.date_to.map(|d| d.format(DATE_FORMAT).to_string()),
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
