//! Error taxonomy for the governance engine.
//!
//! Validation errors from a collaborator propagate to the caller unchanged;
//! a validation failure yields no [`crate::Decision`] at all — the engine
//! does not emit a partial audit record for a rejected `Action`. Storage
//! errors abort the current evaluation without mutating the hash chain.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error(transparent)]
    Trust(#[from] gov_trust::TrustError),

    #[error(transparent)]
    Audit(#[from] gov_audit::AuditError),
}

pub type GovernanceResult<T> = Result<T, GovernanceError>;
