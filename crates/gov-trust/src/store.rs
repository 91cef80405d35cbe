//! In-memory assignment storage and change history.
//!
//! Not thread-safe — callers in multi-threaded hosts wrap [`TrustLadder`]
//! (which owns one of these) in a lock.

use std::collections::HashMap;

use crate::levels::TRUST_LEVEL_MIN;
use crate::types::{TrustAssignment, TrustChangeKind, TrustChangeRecord, scope_key};

pub(crate) struct AssignmentStore {
    assignments: HashMap<String, TrustAssignment>,
    history: HashMap<String, Vec<TrustChangeRecord>>,
    max_history_per_scope: usize,
}

impl AssignmentStore {
    pub(crate) fn new(max_history_per_scope: usize) -> Self {
        Self {
            assignments: HashMap::new(),
            history: HashMap::new(),
            max_history_per_scope,
        }
    }

    pub(crate) fn record_manual(
        &mut self,
        agent_id: &str,
        scope: &str,
        level: crate::levels::TrustLevel,
        reason: Option<String>,
        assigned_by: Option<String>,
        now_ms: i64,
    ) -> TrustAssignment {
        let key = scope_key(agent_id, scope);
        let previous = self.assignments.get(&key).map(|a| a.assigned_level);

        let assignment = TrustAssignment {
            agent_id: agent_id.to_string(),
            scope: scope.to_string(),
            assigned_level: level,
            assigned_at: now_ms,
            reason: reason.clone(),
            assigned_by: assigned_by.clone(),
        };
        self.assignments.insert(key.clone(), assignment.clone());

        let record = TrustChangeRecord {
            agent_id: agent_id.to_string(),
            scope: scope.to_string(),
            previous_level: previous,
            new_level: level,
            changed_at: now_ms,
            kind: TrustChangeKind::Manual,
            reason,
            changed_by: assigned_by,
        };
        self.push_history(&key, record);
        assignment
    }

    pub(crate) fn record_decay(
        &mut self,
        agent_id: &str,
        scope: &str,
        previous_level: crate::levels::TrustLevel,
        new_level: crate::levels::TrustLevel,
        kind: TrustChangeKind,
        now_ms: i64,
    ) {
        let key = scope_key(agent_id, scope);
        let reason = match kind {
            TrustChangeKind::DecayCliff => {
                Some("assignment TTL expired; trust reset to the floor".to_string())
            }
            TrustChangeKind::DecayStep => {
                Some("gradual decay step; trust decreased by one level".to_string())
            }
            _ => None,
        };
        let record = TrustChangeRecord {
            agent_id: agent_id.to_string(),
            scope: scope.to_string(),
            previous_level: Some(previous_level),
            new_level,
            changed_at: now_ms,
            kind,
            reason,
            changed_by: None,
        };
        self.push_history(&key, record);
    }

    /// Remove the assignment for (agent, scope). Returns true if one existed.
    pub(crate) fn revoke(&mut self, agent_id: &str, scope: &str, now_ms: i64) -> bool {
        let key = scope_key(agent_id, scope);
        let Some(existing) = self.assignments.remove(&key) else {
            return false;
        };

        let record = TrustChangeRecord {
            agent_id: agent_id.to_string(),
            scope: scope.to_string(),
            previous_level: Some(existing.assigned_level),
            new_level: TRUST_LEVEL_MIN,
            changed_at: now_ms,
            kind: TrustChangeKind::Revocation,
            reason: Some("assignment explicitly revoked".to_string()),
            changed_by: None,
        };
        self.push_history(&key, record);
        true
    }

    pub(crate) fn get(&self, agent_id: &str, scope: &str) -> Option<&TrustAssignment> {
        self.assignments.get(&scope_key(agent_id, scope))
    }

    pub(crate) fn list_all(&self) -> Vec<TrustAssignment> {
        self.assignments.values().cloned().collect()
    }

    pub(crate) fn get_history(&self, agent_id: &str, scope: &str) -> Vec<TrustChangeRecord> {
        self.history
            .get(&scope_key(agent_id, scope))
            .cloned()
            .unwrap_or_default()
    }

    /// The `new_level` of the most recently recorded history entry, used to
    /// avoid appending duplicate decay entries on repeated reads.
    pub(crate) fn last_recorded_level(&self, agent_id: &str, scope: &str) -> Option<crate::levels::TrustLevel> {
        self.history
            .get(&scope_key(agent_id, scope))
            .and_then(|records| records.last())
            .map(|r| r.new_level)
    }

    fn push_history(&mut self, key: &str, record: TrustChangeRecord) {
        let records = self.history.entry(key.to_string()).or_default();
        records.push(record);
        if self.max_history_per_scope > 0 && records.len() > self.max_history_per_scope {
            let excess = records.len() - self.max_history_per_scope;
            records.drain(0..excess);
        }
    }
}
