//! Error taxonomy for consent operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    #[error("agent id must be a non-empty string")]
    InvalidAgentId,

    #[error("data type must be a non-empty string")]
    InvalidDataType,

    #[error("granted_by must be a non-empty string")]
    InvalidGrantedBy,

    #[error(
        "no consent record found for agent {agent_id:?}, data type {data_type:?}, purpose {purpose:?}"
    )]
    ConsentNotFound {
        agent_id: String,
        data_type: String,
        purpose: Option<String>,
    },
}

pub type ConsentResult<T> = Result<T, ConsentError>;
