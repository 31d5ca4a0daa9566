// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{DatabaseError, StorageError};
use cb_core::ValidationError;

/// Discriminant for [`TransactionError`], for callers that branch on the
/// kind of failure without caring about its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Database,
    Network,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Database => "database",
            ErrorKind::Network => "network",
            ErrorKind::Storage => "storage",
        }
    }
}

/// Failure of a transaction operation.
///
/// - `Validation`: caller input defect; never retried, never queued
/// - `Database`: the remote store rejected an operation
/// - `Network`: the remote store could not be read and there is no
///   offline fallback
/// - `Storage`: local persistence failed; a pending write may be lost
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(DatabaseError),

    #[error("network error: {0}")]
    Network(DatabaseError),

    #[error("local storage error: {0}\n  hint: pending transactions could not be saved")]
    Storage(#[from] StorageError),
}

impl TransactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransactionError::Validation(_) => ErrorKind::Validation,
            TransactionError::Database(_) => ErrorKind::Database,
            TransactionError::Network(_) => ErrorKind::Network,
            TransactionError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// All possible errors that can occur in the cashbox CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'cashbox init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("invalid driver range '{0}'\n  hint: use MIN-MAX, for example 1-6")]
    InvalidDriverRange(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] cb_core::Error),
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Transaction(TransactionError::Validation(e))
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::Transaction(TransactionError::Storage(e))
    }
}

/// A specialized Result type for cashbox operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
