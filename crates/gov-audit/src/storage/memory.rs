//! Volatile in-memory storage backend. Data is lost on process exit.

use async_trait::async_trait;

use crate::error::AuditResult;
use crate::storage::AuditStorage;
use crate::types::{AuditFilter, AuditRecord};

#[derive(Default)]
pub struct MemoryAuditStore {
    records: Vec<AuditRecord>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditStorage for MemoryAuditStore {
    async fn append(&mut self, record: AuditRecord) -> AuditResult<()> {
        self.records.push(record);
        Ok(())
    }

    async fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditRecord>> {
        let matched: Vec<AuditRecord> = self.records.iter().filter(|r| filter.matches(r)).cloned().collect();
        Ok(filter.paginate(matched))
    }

    async fn all(&self) -> AuditResult<Vec<AuditRecord>> {
        Ok(self.records.clone())
    }

    async fn count(&self) -> AuditResult<usize> {
        Ok(self.records.len())
    }
}
