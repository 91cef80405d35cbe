//! Append-only NDJSON file storage backend.
//!
//! The file is opened in append mode on every write and never truncated or
//! rewritten. Reads always parse the full file from disk so the in-process
//! view stays consistent with anything a concurrent writer appended.
//! Multi-process writers are unsupported without external coordination.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::canonical::to_canonical_json;
use crate::error::AuditResult;
use crate::storage::AuditStorage;
use crate::types::{AuditFilter, AuditRecord};

pub struct FileAuditStore {
    path: PathBuf,
}

impl FileAuditStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the last non-empty line of the file synchronously, without
    /// parsing the full record set. Used at startup to restore a
    /// [`crate::HashChain`]'s tip without loading the whole corpus.
    pub fn read_last_line_sync(path: &Path) -> Option<String> {
        let contents = std::fs::read_to_string(path).ok()?;
        contents.lines().map(str::trim).filter(|line| !line.is_empty()).next_back().map(str::to_string)
    }
}

#[async_trait]
impl AuditStorage for FileAuditStore {
    async fn append(&mut self, record: AuditRecord) -> AuditResult<()> {
        let line = to_canonical_json(&record);
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }

    async fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditRecord>> {
        let all = self.all().await?;
        let matched: Vec<AuditRecord> = all.into_iter().filter(|r| filter.matches(r)).collect();
        Ok(filter.paginate(matched))
    }

    async fn all(&self) -> AuditResult<Vec<AuditRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = tokio::fs::File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut records = Vec::new();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(error) => warn!(%error, "skipping malformed audit record line"),
            }
        }

        Ok(records)
    }

    async fn count(&self) -> AuditResult<usize> {
        Ok(self.all().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuditEntry;
    use crate::HashChain;
    use uuid::Uuid;

    fn sample(agent_id: &str) -> AuditEntry {
        AuditEntry {
            agent_id: agent_id.to_string(),
            action: "evaluate".to_string(),
            permitted: true,
            trust_level: None,
            required_level: None,
            budget_used: None,
            budget_remaining: None,
            reason: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn append_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.ndjson");

        let mut chain = HashChain::new();
        let record = chain.append(sample("a1"), Uuid::new_v4(), 1);

        let mut store = FileAuditStore::new(&path);
        store.append(record.clone()).await.unwrap();

        let reopened = FileAuditStore::new(&path);
        let all = reopened.all().await.unwrap();
        assert_eq!(all, vec![record]);
    }

    #[tokio::test]
    async fn written_line_is_canonical_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.ndjson");

        let mut chain = HashChain::new();
        // trust_level, required_level, budget_used, budget_remaining, reason,
        // and metadata are all absent on this sample — any of them showing
        // up as an explicit `null` means the write path isn't canonical.
        let record = chain.append(sample("a1"), Uuid::new_v4(), 1);

        let mut store = FileAuditStore::new(&path);
        store.append(record.clone()).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let line = contents.lines().next().unwrap();
        assert!(!line.contains("null"), "canonical line must omit absent optionals, got: {line}");

        let keys: Vec<String> = match serde_json::from_str::<serde_json::Value>(line).unwrap() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("expected an object, got {other:?}"),
        };
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted, "keys must already be in sorted order on disk");
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.ndjson");

        let mut chain = HashChain::new();
        let record = chain.append(sample("a1"), Uuid::new_v4(), 1);
        let good_line = serde_json::to_string(&record).unwrap();
        tokio::fs::write(&path, format!("{good_line}\nnot json\n\n")).await.unwrap();

        let store = FileAuditStore::new(&path);
        let all = store.all().await.unwrap();
        assert_eq!(all, vec![record]);
    }

    #[test]
    fn read_last_line_sync_returns_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.ndjson");
        std::fs::write(&path, "{\"a\":1}\n{\"a\":2}\n\n").unwrap();
        assert_eq!(FileAuditStore::read_last_line_sync(&path), Some("{\"a\":2}".to_string()));
    }

    #[test]
    fn read_last_line_sync_handles_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.ndjson");
        assert_eq!(FileAuditStore::read_last_line_sync(&path), None);
    }
}
