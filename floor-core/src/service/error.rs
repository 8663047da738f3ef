use chrono::NaiveDate;
use thiserror::Error;

use crate::calculations::CalculationError;
use crate::repository::StoreError;

/// Failures surfaced at the lifecycle service boundary.
///
/// Store failures pass through unchanged inside [`ServiceError::Store`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no orders found for {0}")]
    NoOrdersForDate(NaiveDate),

    #[error("no changes detected, order {0} is not edited")]
    NoChangeDetected(u32),

    #[error("unknown product type '{0}'")]
    UnknownProduct(String),

    #[error("unknown state '{0}'")]
    UnknownState(String),

    #[error("invalid order: {0}")]
    InvalidOrder(String),
}

impl From<CalculationError> for ServiceError {
    fn from(err: CalculationError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOrder(msg.into())
    }

    /// True for a failed `(date, order number)` lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::OrderNotFound { .. }))
    }
}
