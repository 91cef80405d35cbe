//! Canonical JSON construction and SHA-256 hashing.
//!
//! `serde_json::Map` is a `BTreeMap` in this workspace (the `preserve_order`
//! feature is never enabled), so every `Value::Object` we build here
//! serializes with lexicographically sorted keys for free. Combined with
//! `serde_json::to_string` — which never inserts whitespace between tokens
//! and never escapes non-ASCII bytes — this gives us the bit-exact
//! canonical form the chain hash depends on without any bespoke serializer.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::{AuditEntry, AuditRecord};

/// Fixed 64-character hex constant used as `previous_hash` for the first
/// record in any chain.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

const _: () = assert!(GENESIS_HASH.len() == 64);

/// Build the canonical JSON value for a pending record — every field the
/// completed [`AuditRecord`] will carry except `record_hash`. Optional
/// fields are included only when present.
pub(crate) fn build_pending(
    id: &uuid::Uuid,
    timestamp: i64,
    entry: &AuditEntry,
    previous_hash: &str,
) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), Value::String(id.to_string()));
    map.insert("timestamp".to_string(), Value::from(timestamp));
    map.insert("agent_id".to_string(), Value::String(entry.agent_id.clone()));
    map.insert("action".to_string(), Value::String(entry.action.clone()));
    map.insert("permitted".to_string(), Value::Bool(entry.permitted));
    map.insert("previous_hash".to_string(), Value::String(previous_hash.to_string()));

    if let Some(trust_level) = entry.trust_level {
        map.insert("trust_level".to_string(), Value::from(trust_level));
    }
    if let Some(required_level) = entry.required_level {
        map.insert("required_level".to_string(), Value::from(required_level));
    }
    if let Some(budget_used) = entry.budget_used {
        map.insert("budget_used".to_string(), json_f64(budget_used));
    }
    if let Some(budget_remaining) = entry.budget_remaining {
        map.insert("budget_remaining".to_string(), json_f64(budget_remaining));
    }
    if let Some(reason) = &entry.reason {
        map.insert("reason".to_string(), Value::String(reason.clone()));
    }
    if let Some(metadata) = &entry.metadata {
        map.insert("metadata".to_string(), metadata.clone());
    }

    Value::Object(map)
}

/// Rebuild the canonical pending value for an already-completed record, for
/// re-verification. Mirrors [`build_pending`] field-for-field.
pub(crate) fn rebuild_pending(record: &AuditRecord) -> Value {
    let entry = AuditEntry {
        agent_id: record.agent_id.clone(),
        action: record.action.clone(),
        permitted: record.permitted,
        trust_level: record.trust_level,
        required_level: record.required_level,
        budget_used: record.budget_used,
        budget_remaining: record.budget_remaining,
        reason: record.reason.clone(),
        metadata: record.metadata.clone(),
    };
    build_pending(&record.id, record.timestamp, &entry, &record.previous_hash)
}

fn json_f64(value: f64) -> Value {
    serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// Canonical JSON string for a completed record — the same sorted-key,
/// absent-means-omitted form [`build_pending`] produces, extended with
/// `previous_hash` and `record_hash`. This is what storage backends must
/// write to disk; never the derive-order `Serialize` impl on
/// [`AuditRecord`], which neither sorts keys nor omits `None` fields.
pub(crate) fn to_canonical_json(record: &AuditRecord) -> String {
    let mut map = match rebuild_pending(record) {
        Value::Object(map) => map,
        _ => unreachable!("rebuild_pending always returns an object"),
    };
    map.insert("record_hash".to_string(), Value::String(record.record_hash.clone()));
    serde_json::to_string(&Value::Object(map)).expect("Value serialization is infallible")
}

/// `SHA256(canonical(pending) || "\n" || previous_hash)`, lowercase hex.
pub(crate) fn compute_hash(pending: &Value, previous_hash: &str) -> String {
    let canonical = serde_json::to_string(pending).expect("Value serialization is infallible");
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hasher.update(b"\n");
    hasher.update(previous_hash.as_bytes());
    hex::encode(hasher.finalize())
}
