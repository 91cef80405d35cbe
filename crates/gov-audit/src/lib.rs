//! Append-only, SHA-256 hash-chained audit log.
//!
//! Every record carries a digest chaining it to its predecessor
//! ([`HashChain`]); a verifier re-derives the chain to detect mutation.
//! Records persist through either backend behind the shared
//! [`AuditStorage`] trait — [`MemoryAuditStore`] for tests and short-lived
//! processes, [`FileAuditStore`] for an append-only NDJSON file.

#![forbid(unsafe_code)]

mod canonical;
mod chain;
mod error;
mod storage;
mod types;

pub use canonical::GENESIS_HASH;
pub use chain::HashChain;
pub use error::{AuditError, AuditResult};
pub use storage::{AuditStorage, FileAuditStore, MemoryAuditStore};
pub use types::{AuditEntry, AuditFilter, AuditRecord, ChainVerificationResult};
