//! Error taxonomy for budget operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BudgetError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("no spending envelope found for category {0:?}")]
    NoEnvelope(String),

    #[error("{requested} exceeds available budget {available} for category {category:?}")]
    BudgetExceeded {
        category: String,
        requested: f64,
        available: f64,
    },

    #[error("invalid period identifier {0:?}")]
    InvalidPeriod(String),
}

pub type BudgetResult<T> = Result<T, BudgetError>;
