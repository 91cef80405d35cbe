//! Validation errors for the trust ladder.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrustError {
    #[error("agent id must be a non-empty, non-whitespace string")]
    InvalidAgentId,

    #[error("trust level must be an integer in [0, 5], got {0}")]
    InvalidTrustLevel(i64),
}

pub type TrustResult<T> = Result<T, TrustError>;
