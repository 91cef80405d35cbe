//! [`HashChain`] — SHA-256 linkage and verification.
//!
//! Not reentrant: callers must serialize calls to [`HashChain::append`].
//! Hosts wrap it and the storage backend behind a single mutex.

use uuid::Uuid;

use crate::canonical::{GENESIS_HASH, build_pending, compute_hash, rebuild_pending};
use crate::types::{AuditEntry, AuditRecord, ChainVerificationResult};

pub struct HashChain {
    last_hash: String,
}

impl HashChain {
    /// Start a fresh chain at the genesis hash.
    pub fn new() -> Self {
        Self { last_hash: GENESIS_HASH.to_string() }
    }

    /// Seed the chain at a known tip — pass the last stored hash when
    /// restoring chain state from durable storage.
    pub fn with_tip(last_hash: impl Into<String>) -> Self {
        Self { last_hash: last_hash.into() }
    }

    /// Build the record that would be appended next, against the current
    /// tip, without advancing it. Pairs with [`HashChain::commit`]: callers
    /// that must persist a record before it becomes part of the chain (as
    /// [`crate::AuditStorage::append`] requires) call `prepare`, persist the
    /// result, and only then call `commit` — so a storage failure never
    /// leaves the tip pointing at a record nothing holds.
    pub fn prepare(&self, entry: AuditEntry, id: Uuid, timestamp: i64) -> AuditRecord {
        let pending = build_pending(&id, timestamp, &entry, &self.last_hash);
        let record_hash = compute_hash(&pending, &self.last_hash);

        AuditRecord {
            id,
            timestamp,
            agent_id: entry.agent_id,
            action: entry.action,
            permitted: entry.permitted,
            trust_level: entry.trust_level,
            required_level: entry.required_level,
            budget_used: entry.budget_used,
            budget_remaining: entry.budget_remaining,
            reason: entry.reason,
            metadata: entry.metadata,
            previous_hash: self.last_hash.clone(),
            record_hash,
        }
    }

    /// Advance the tip to `record_hash`. Callers must pass the `record_hash`
    /// of a record this chain's current tip actually [`HashChain::prepare`]d
    /// — out-of-order or foreign hashes silently desynchronise the chain,
    /// since this method trusts its input rather than re-deriving it.
    pub fn commit(&mut self, record_hash: String) {
        self.last_hash = record_hash;
    }

    /// Link an entry into the chain, computing its `record_hash` against
    /// the current tip and advancing the tip to the new hash in one step.
    /// Equivalent to `prepare` immediately followed by `commit` — for
    /// callers with no persistence step to sequence in between (tests,
    /// in-memory-only chains).
    pub fn append(&mut self, entry: AuditEntry, id: Uuid, timestamp: i64) -> AuditRecord {
        let record = self.prepare(entry, id, timestamp);
        self.commit(record.record_hash.clone());
        record
    }

    /// Current tip, or the genesis hash when nothing has been appended yet.
    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    /// Walk `records` from index 0, re-deriving each expected hash and
    /// reporting the first discrepancy. Pure — never mutates, never raises.
    pub fn verify(records: &[AuditRecord]) -> ChainVerificationResult {
        let mut expected_previous = GENESIS_HASH.to_string();

        for (index, record) in records.iter().enumerate() {
            if record.previous_hash != expected_previous {
                return ChainVerificationResult::Failure {
                    record_count: records.len(),
                    broken_at: index,
                    reason: format!(
                        "record at index {index} has previous_hash {:?} but expected {:?}",
                        record.previous_hash, expected_previous
                    ),
                };
            }

            let pending = rebuild_pending(record);
            let expected_hash = compute_hash(&pending, &expected_previous);

            if record.record_hash != expected_hash {
                return ChainVerificationResult::Failure {
                    record_count: records.len(),
                    broken_at: index,
                    reason: format!(
                        "record at index {index} (id={}) has record_hash {:?} but recomputed hash is {:?}; content may have been altered",
                        record.id, record.record_hash, expected_hash
                    ),
                };
            }

            expected_previous = record.record_hash.clone();
        }

        ChainVerificationResult::Success { record_count: records.len() }
    }
}

impl Default for HashChain {
    fn default() -> Self {
        Self::new()
    }
}
