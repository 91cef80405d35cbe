//! Core data types for audit entries, records, and queries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied data for one governance decision, prior to hashing.
///
/// Optional fields absent here stay absent from the canonical JSON that
/// gets hashed — they are never serialized as explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub agent_id: String,
    pub action: String,
    pub permitted: bool,
    pub trust_level: Option<i64>,
    pub required_level: Option<i64>,
    pub budget_used: Option<f64>,
    pub budget_remaining: Option<f64>,
    pub reason: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// An immutable, hash-chained record of a single governance decision.
///
/// `record_hash` is the SHA-256 digest of this record's canonical JSON
/// (excluding `record_hash` itself) concatenated with `previous_hash`.
/// Mutating any field other than `record_hash` after the fact invalidates
/// every subsequent link in the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    /// Wall-clock time in ms since Unix epoch.
    pub timestamp: i64,
    pub agent_id: String,
    pub action: String,
    pub permitted: bool,
    pub trust_level: Option<i64>,
    pub required_level: Option<i64>,
    pub budget_used: Option<f64>,
    pub budget_remaining: Option<f64>,
    pub reason: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub previous_hash: String,
    pub record_hash: String,
}

/// Optional, AND-combined filter applied to audit queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub agent_id: Option<String>,
    pub action: Option<String>,
    pub permitted: Option<bool>,
    /// Inclusive lower bound on `timestamp`.
    pub start_time: Option<i64>,
    /// Inclusive upper bound on `timestamp`.
    pub end_time: Option<i64>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub(crate) fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(agent_id) = &self.agent_id {
            if &record.agent_id != agent_id {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if &record.action != action {
                return false;
            }
        }
        if let Some(permitted) = self.permitted {
            if record.permitted != permitted {
                return false;
            }
        }
        if let Some(start_time) = self.start_time {
            if record.timestamp < start_time {
                return false;
            }
        }
        if let Some(end_time) = self.end_time {
            if record.timestamp > end_time {
                return false;
            }
        }
        true
    }

    /// Apply `offset` then `limit` to an already-filtered, ascending-order slice.
    pub(crate) fn paginate(&self, records: Vec<AuditRecord>) -> Vec<AuditRecord> {
        let offset = self.offset.unwrap_or(0);
        let mut records: Vec<AuditRecord> = records.into_iter().skip(offset).collect();
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        records
    }
}

/// Outcome of walking a chain with [`crate::HashChain::verify`]. Verification
/// is pure and never fails — discrepancies are reported as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChainVerificationResult {
    Success { record_count: usize },
    Failure { record_count: usize, broken_at: usize, reason: String },
}

impl ChainVerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
