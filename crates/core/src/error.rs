// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for cb-core operations.

use thiserror::Error;

use crate::validate::ValidationError;

/// All possible errors that can occur in cb-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("reserved id: '{0}'\n  hint: ids starting with 'pending_' are assigned locally only")]
    ReservedId(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Whether the error means the collection could not be reached at all,
    /// as opposed to refusing a particular operation.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Database(err) => matches!(
                err.sqlite_error_code(),
                Some(
                    rusqlite::ErrorCode::CannotOpen
                        | rusqlite::ErrorCode::DatabaseBusy
                        | rusqlite::ErrorCode::DatabaseLocked
                        | rusqlite::ErrorCode::SystemIoFailure
                        | rusqlite::ErrorCode::NotADatabase
                )
            ),
            _ => false,
        }
    }
}

/// A specialized Result type for cb-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
