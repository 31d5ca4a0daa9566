// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cb-core: Shared library for the cashbox transaction recorder
//!
//! This crate provides the record model, validation rules, the merge
//! algorithm for pending and confirmed records, and the SQLite-backed
//! remote collection used by the cashbox CLI.

pub mod clock;
pub mod db;
pub mod error;
pub mod filter;
pub mod id;
pub mod merge;
pub mod summary;
pub mod transaction;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{Database, RowQuery, TransactionRow};
pub use error::{Error, Result};
pub use filter::TransactionFilter;
pub use merge::{merge_views, sort_newest_first};
pub use summary::{summarize, DriverSummary};
pub use transaction::{NewTransaction, RecordId, Transaction, PENDING_ID_PREFIX};
pub use validate::{validate, DriverRange, ValidationError};
