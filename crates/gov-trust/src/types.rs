//! Core data types for trust assignments, history, and check results.

use serde::{Deserialize, Serialize};

use crate::levels::TrustLevel;

/// A point-in-time record of a trust assignment made by a human operator.
///
/// Immutable once created. Re-assigning the same (agent, scope) pair does
/// not mutate this record — it replaces it with a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustAssignment {
    pub agent_id: String,
    /// Named scope. Empty string denotes the global scope.
    pub scope: String,
    pub assigned_level: TrustLevel,
    /// Wall-clock time in ms since Unix epoch.
    pub assigned_at: i64,
    pub reason: Option<String>,
    pub assigned_by: Option<String>,
}

/// Why a trust-change history entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustChangeKind {
    /// An operator explicitly called `assign`.
    Manual,
    /// TTL expired under cliff decay; level dropped straight to the floor.
    DecayCliff,
    /// One gradual-decay step occurred.
    DecayStep,
    /// The assignment was explicitly revoked.
    Revocation,
}

/// An append-only history entry for one (agent, scope) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustChangeRecord {
    pub agent_id: String,
    pub scope: String,
    /// Level before this change; `None` for an agent's first assignment.
    pub previous_level: Option<TrustLevel>,
    pub new_level: TrustLevel,
    pub changed_at: i64,
    pub kind: TrustChangeKind,
    pub reason: Option<String>,
    pub changed_by: Option<String>,
}

/// Result of checking whether an agent's effective level meets a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustCheckResult {
    pub permitted: bool,
    pub effective: TrustLevel,
    pub required: TrustLevel,
    pub scope: String,
    pub checked_at: i64,
}

/// Build the canonical lookup key for a (agent_id, scope) pair.
///
/// A NUL separator is used so no combination of inputs can collide with a
/// different (agent_id, scope) pair.
pub(crate) fn scope_key(agent_id: &str, scope: &str) -> String {
    format!("{agent_id}\0{scope}")
}
