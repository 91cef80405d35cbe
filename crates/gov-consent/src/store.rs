//! In-memory consent record storage.

use std::collections::HashMap;

use crate::types::{ConsentKey, ConsentRecord};

pub(crate) struct ConsentStore {
    records: HashMap<ConsentKey, ConsentRecord>,
}

impl ConsentStore {
    pub(crate) fn new() -> Self {
        Self { records: HashMap::new() }
    }

    pub(crate) fn put(&mut self, record: ConsentRecord) {
        self.records.insert(record.key(), record);
    }

    /// Lookup strategy: exact (agent, data_type, purpose) match first, then
    /// the blanket (purpose=None) record. Expired records never match.
    pub(crate) fn find(&self, agent_id: &str, data_type: &str, purpose: Option<&str>, now_ms: i64) -> Option<&ConsentRecord> {
        if purpose.is_some() {
            let exact = ConsentKey::new(agent_id, data_type, purpose);
            if let Some(record) = self.records.get(&exact) {
                if !record.is_expired(now_ms) {
                    return Some(record);
                }
            }
        }

        let blanket = ConsentKey::new(agent_id, data_type, None);
        let record = self.records.get(&blanket)?;
        (!record.is_expired(now_ms)).then_some(record)
    }

    pub(crate) fn remove(&mut self, agent_id: &str, data_type: &str, purpose: Option<&str>) -> bool {
        self.records.remove(&ConsentKey::new(agent_id, data_type, purpose)).is_some()
    }

    pub(crate) fn remove_all_for_agent(&mut self, agent_id: &str) -> usize {
        let keys: Vec<ConsentKey> = self
            .records
            .keys()
            .filter(|key| key.agent_id == agent_id)
            .cloned()
            .collect();
        for key in &keys {
            self.records.remove(key);
        }
        keys.len()
    }

    pub(crate) fn list_for_agent(&self, agent_id: &str) -> Vec<ConsentRecord> {
        self.records
            .values()
            .filter(|record| record.agent_id == agent_id)
            .cloned()
            .collect()
    }
}
