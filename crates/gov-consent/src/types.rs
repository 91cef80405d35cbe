//! Core data types for consent records and checks.

use serde::{Deserialize, Serialize};

/// An immutable record of a consent grant.
///
/// Uniquely keyed by (`agent_id`, `data_type`, `purpose`). A record with
/// `purpose = None` is a blanket grant covering every purpose for that
/// agent + data type pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub agent_id: String,
    pub data_type: String,
    pub purpose: Option<String>,
    pub granted_by: String,
    /// Wall-clock time in ms since Unix epoch.
    pub granted_at: i64,
    pub expires_at: Option<i64>,
}

impl ConsentRecord {
    pub(crate) fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| now_ms >= expires_at)
    }

    pub(crate) fn key(&self) -> ConsentKey {
        ConsentKey {
            agent_id: self.agent_id.clone(),
            data_type: self.data_type.clone(),
            purpose: self.purpose.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ConsentKey {
    pub agent_id: String,
    pub data_type: String,
    pub purpose: Option<String>,
}

impl ConsentKey {
    pub(crate) fn new(agent_id: &str, data_type: &str, purpose: Option<&str>) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            data_type: data_type.to_string(),
            purpose: purpose.map(str::to_string),
        }
    }
}

/// Result of checking whether consent has been granted for a data access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentCheckResult {
    pub granted: bool,
    pub agent_id: String,
    pub data_type: String,
    pub purpose: Option<String>,
    pub reason: String,
    /// The matching record, if one was found. Absent in permissive-mode
    /// fallback-allow and in default-deny absence.
    pub record: Option<ConsentRecord>,
}
