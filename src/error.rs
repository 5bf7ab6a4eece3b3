// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the ledger operations.
///
/// `Validation`, `InUse` and `NotFound` are recoverable and meant to be shown
/// to the user. `Storage` and `Corrupt` mean the database itself misbehaved.
#[derive(Debug, Error)]
pub enum FinError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{entity} is still referenced by {references} transaction(s)")]
    InUse { entity: String, references: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("{what} is out of range")]
    Overflow { what: &'static str },

    #[error("corrupt {column} value '{value}' in storage")]
    Corrupt { column: &'static str, value: String },
}

pub type FinResult<T> = std::result::Result<T, FinError>;

impl FinError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        FinError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        FinError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FinError::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FinError::NotFound { .. })
    }
}
