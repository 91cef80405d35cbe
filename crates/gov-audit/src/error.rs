//! Error taxonomy for audit storage. Validation and chain-integrity
//! findings are reported as data (see [`crate::ChainVerificationResult`]),
//! never raised as errors — only storage I/O failures are.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed audit record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AuditResult<T> = Result<T, AuditError>;
