//! Round-up error types.

use thiserror::Error;
use untether_shared::AppError;
use untether_shared::types::RoundupId;

/// Rejections raised by the calculator.
///
/// Every variant is caused by caller input and is never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundupError {
    /// The rounding rule is not one of `dollar`, `quarter` or `custom`.
    #[error("invalid rounding rule: {0}")]
    InvalidPolicy(String),

    /// The `custom` rule was selected without a strictly positive increment.
    #[error("custom rounding amount must be positive")]
    InvalidIncrement,

    /// The amount is negative, not finite, or too large to round.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Failure reported by a round-up repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not complete the operation.
    #[error("round-up store unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by [`RoundupService`](super::RoundupService).
#[derive(Debug, Error)]
pub enum RoundupServiceError {
    /// The calculation request was rejected.
    #[error(transparent)]
    Invalid(#[from] RoundupError),

    /// A history, summary or batch request was malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// No record with this ID belongs to the user.
    #[error("round-up calculation not found: {0}")]
    NotFound(RoundupId),

    /// Persisting or reading records failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<RoundupServiceError> for AppError {
    fn from(err: RoundupServiceError) -> Self {
        match err {
            RoundupServiceError::Invalid(e) => Self::Validation(e.to_string()),
            RoundupServiceError::InvalidQuery(msg) => Self::Validation(msg),
            RoundupServiceError::NotFound(id) => {
                Self::NotFound(format!("round-up calculation {id}"))
            }
            RoundupServiceError::Repository(e) => Self::Storage(e.to_string()),
        }
    }
}
