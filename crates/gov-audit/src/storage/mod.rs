//! Storage backends for audit records.
//!
//! Implementations must guarantee append-only semantics: records written
//! through [`AuditStorage::append`] are never altered or deleted by the
//! storage layer itself.

mod file;
mod memory;

pub use file::FileAuditStore;
pub use memory::MemoryAuditStore;

use async_trait::async_trait;

use crate::error::AuditResult;
use crate::types::{AuditFilter, AuditRecord};

#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Persist a fully-formed record. Called after the chain has computed
    /// and embedded `record_hash`. Implementations must not modify it.
    async fn append(&mut self, record: AuditRecord) -> AuditResult<()>;

    /// Records matching `filter`, in ascending timestamp order.
    async fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditRecord>>;

    /// Every record in the store, in ascending timestamp order. Used by the
    /// chain verifier, which requires the full corpus.
    async fn all(&self) -> AuditResult<Vec<AuditRecord>>;

    async fn count(&self) -> AuditResult<usize>;
}
