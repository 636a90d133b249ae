//! Settlement error types.
//!
//! None of these are transient. The caller decides whether to retry after
//! fixing the cause; a `record` failure means the settlement is not yet
//! tracked and it is `record` that must be retried, never the payment.

use pdv_shared::AppError;
use pdv_shared::types::SettlementEntryId;
use thiserror::Error;

use crate::split::SplitError;

/// Errors that can occur during settlement operations.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Malformed input: negative amount, bad percentage, empty reference.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] SplitError),

    /// A pending entry already exists for this transaction reference.
    #[error("Transaction {0} already has a pending settlement")]
    DuplicateTransaction(String),

    /// No entry with this id exists.
    #[error("Settlement entry not found: {0}")]
    NotFound(SettlementEntryId),

    /// The entry is not pending anymore.
    #[error("Settlement entry {0} is already resolved")]
    AlreadyResolved(SettlementEntryId),

    /// The underlying storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SettlementError {
    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::DuplicateTransaction(_) => "DUPLICATE_TRANSACTION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyResolved(_) => "ALREADY_RESOLVED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        let message = err.to_string();
        match err {
            SettlementError::InvalidArgument(_) => Self::Validation(message),
            SettlementError::DuplicateTransaction(_) | SettlementError::AlreadyResolved(_) => {
                Self::Conflict(message)
            }
            SettlementError::NotFound(_) => Self::NotFound(message),
            SettlementError::Storage(_) => Self::Database(message),
        }
    }
}
