// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed remote transaction collection.
//!
//! The [`Database`] is the append-only store that confirmed records live in.
//! It speaks the store schema (`driver_id`, `order_total`, ...) and knows
//! nothing about pending records or validation rules.

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::id::generate_unique_id;

/// SQL schema for the transaction collection.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    driver_id INTEGER NOT NULL,
    order_total TEXT NOT NULL,
    amount_received TEXT NOT NULL,
    change_amount TEXT NOT NULL,
    date TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    inserted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_timestamp ON transactions(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_driver ON transactions(driver_id);
"#;

/// A row in the store schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Assigned by the store on insert; ignored on input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub driver_id: i64,
    pub order_total: Decimal,
    pub amount_received: Decimal,
    pub change_amount: Decimal,
    /// Logical day as `YYYY-MM-DD`.
    pub date: String,
    pub timestamp: i64,
}

/// Predicate for selecting rows. Results are always ordered by timestamp, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    pub driver_id: Option<i64>,
    /// Inclusive lower bound on `date`.
    pub date_from: Option<String>,
    /// Inclusive upper bound on `date`.
    pub date_to: Option<String>,
}

/// Parse a decimal stored as text, returning a rusqlite error on parse failure.
fn parse_decimal(value: &str, column: &str) -> std::result::Result<Decimal, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(crate::Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> std::result::Result<TransactionRow, rusqlite::Error> {
    let order_total: String = row.get(2)?;
    let amount_received: String = row.get(3)?;
    let change_amount: String = row.get(4)?;
    Ok(TransactionRow {
        id: row.get(0)?,
        driver_id: row.get(1)?,
        order_total: parse_decimal(&order_total, "order_total")?,
        amount_received: parse_decimal(&amount_received, "amount_received")?,
        change_amount: parse_decimal(&change_amount, "change_amount")?,
        date: row.get(5)?,
        timestamp: row.get(6)?,
    })
}

/// SQLite connection holding the transaction collection.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open the collection at the given path, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Database { conn })
    }

    /// Open an in-memory collection (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Database { conn })
    }

    /// Check whether a row with this id exists.
    pub fn row_exists(&self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM transactions WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert one row and return it with its assigned id.
    pub fn insert(&self, row: &TransactionRow) -> Result<TransactionRow> {
        let inserted_at = Utc::now();
        let driver = u32::try_from(row.driver_id).unwrap_or_default();
        let id = generate_unique_id(driver, row.timestamp, &inserted_at, |candidate| {
            self.row_exists(candidate).unwrap_or(false)
        });

        self.conn.execute(
            "INSERT INTO transactions (id, driver_id, order_total, amount_received,
             change_amount, date, timestamp, inserted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                row.driver_id,
                row.order_total.to_string(),
                row.amount_received.to_string(),
                row.change_amount.to_string(),
                row.date,
                row.timestamp,
                inserted_at.to_rfc3339(),
            ],
        )?;

        Ok(TransactionRow { id: Some(id), ..row.clone() })
    }

    /// Insert rows one by one. Each row succeeds or fails on its own.
    pub fn insert_batch(&self, rows: &[TransactionRow]) -> Vec<Result<TransactionRow>> {
        rows.iter().map(|row| self.insert(row)).collect()
    }

    /// Select rows matching the query, newest first.
    pub fn select(&self, query: &RowQuery) -> Result<Vec<TransactionRow>> {
        let mut sql = String::from(
            "SELECT id, driver_id, order_total, amount_received, change_amount, date, timestamp
             FROM transactions",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(driver_id) = query.driver_id {
            clauses.push("driver_id = ?");
            values.push(driver_id.into());
        }
        if let Some(ref from) = query.date_from {
            clauses.push("date >= ?");
            values.push(from.clone().into());
        }
        if let Some(ref to) = query.date_to {
            clauses.push("date <= ?");
            values.push(to.clone().into());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY timestamp DESC, inserted_at ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of rows in the collection.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
