//! [`TrustLadder`] — the primary entry point for this crate.

use tracing::{debug, info, warn};

use crate::config::TrustLadderConfig;
use crate::decay::{DecayPolicy, compute_effective};
use crate::error::{TrustError, TrustResult};
use crate::levels::{TRUST_LEVEL_MIN, TrustLevel};
use crate::store::AssignmentStore;
use crate::types::{TrustAssignment, TrustChangeKind, TrustChangeRecord, TrustCheckResult};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The global scope, covering an agent across every named scope that has no
/// assignment of its own.
const GLOBAL_SCOPE: &str = "";

fn validate_agent_id(agent_id: &str) -> TrustResult<()> {
    if agent_id.trim().is_empty() {
        Err(TrustError::InvalidAgentId)
    } else {
        Ok(())
    }
}

/// Manages graduated trust assignments for agents across independent named
/// scopes. All trust changes are strictly manual — [`TrustLadder::assign`]
/// is the only mutator. Decay, if configured, can only lower the effective
/// level that [`TrustLadder::get_level`] returns; it never touches the
/// stored [`TrustAssignment`] itself.
///
/// Not thread-safe. Wrap in a lock for multi-threaded hosts.
pub struct TrustLadder {
    store: AssignmentStore,
    decay: DecayPolicy,
    default_scope: String,
}

impl TrustLadder {
    pub fn new(config: TrustLadderConfig) -> Self {
        Self {
            store: AssignmentStore::new(config.max_history_per_scope),
            decay: config.decay,
            default_scope: config.default_scope,
        }
    }

    fn resolve_scope<'a>(&'a self, scope: Option<&'a str>) -> &'a str {
        scope.unwrap_or(&self.default_scope)
    }

    /// Manually assign a trust level to an agent within an optional scope.
    ///
    /// The only mechanism by which trust changes. Replaces any prior
    /// assignment at the same (agent, scope) pair and appends a `Manual`
    /// history entry recording the previous assigned level, if any.
    pub fn assign(
        &mut self,
        agent_id: &str,
        level: i64,
        scope: Option<&str>,
        reason: Option<String>,
        assigned_by: Option<String>,
    ) -> TrustResult<TrustAssignment> {
        validate_agent_id(agent_id)?;
        let level = TrustLevel::from_i64(level)?;
        let scope = self.resolve_scope(scope).to_string();

        let assignment = self
            .store
            .record_manual(agent_id, &scope, level, reason, assigned_by, now_ms());

        info!(agent_id, scope = %assignment.scope, level = %level, "trust assigned");
        Ok(assignment)
    }

    /// Get the effective trust level for an agent in a scope, applying any
    /// configured decay. Agents with no assignment are at [`TRUST_LEVEL_MIN`].
    ///
    /// Lookup order: the scoped assignment, then the global (`""`)
    /// assignment, then [`TRUST_LEVEL_MIN`]. Decay is computed against
    /// whichever assignment is actually found, and any resulting history
    /// entry is recorded against that assignment's own scope (so a fallback
    /// to global decays and is tracked as the global assignment, not as a
    /// phantom entry under the scope that was merely asked about).
    ///
    /// When decay has lowered the level since the last call, appends a decay
    /// history entry — unless the last recorded level already matches, which
    /// prevents duplicate entries on repeated reads at the same level.
    pub fn get_level(&mut self, agent_id: &str, scope: Option<&str>) -> TrustResult<TrustLevel> {
        validate_agent_id(agent_id)?;
        let requested_scope = self.resolve_scope(scope).to_string();

        let assignment = match self.store.get(agent_id, &requested_scope).cloned() {
            Some(assignment) => assignment,
            None if requested_scope != GLOBAL_SCOPE => {
                match self.store.get(agent_id, GLOBAL_SCOPE).cloned() {
                    Some(assignment) => assignment,
                    None => return Ok(TRUST_LEVEL_MIN),
                }
            }
            None => return Ok(TRUST_LEVEL_MIN),
        };
        let effective_scope = assignment.scope.clone();

        let now = now_ms();
        let result = compute_effective(&self.decay, &assignment, now);

        if result.effective_level != assignment.assigned_level {
            let last_recorded = self.store.last_recorded_level(agent_id, &effective_scope);
            if last_recorded != Some(result.effective_level) {
                let previous = last_recorded.unwrap_or(assignment.assigned_level);
                let kind = match self.decay {
                    DecayPolicy::Cliff { .. } => TrustChangeKind::DecayCliff,
                    _ => TrustChangeKind::DecayStep,
                };
                debug!(agent_id, scope = %effective_scope, from = %previous, to = %result.effective_level, "trust decay recorded");
                self.store.record_decay(
                    agent_id,
                    &effective_scope,
                    previous,
                    result.effective_level,
                    kind,
                    now,
                );
            }
        }

        Ok(result.effective_level)
    }

    /// Check whether an agent's effective level meets `required_level`.
    pub fn check(
        &mut self,
        agent_id: &str,
        required_level: i64,
        scope: Option<&str>,
    ) -> TrustResult<TrustCheckResult> {
        let required = TrustLevel::from_i64(required_level)?;
        let resolved_scope = self.resolve_scope(scope).to_string();
        let effective = self.get_level(agent_id, Some(&resolved_scope))?;

        Ok(TrustCheckResult {
            permitted: effective >= required,
            effective,
            required,
            scope: resolved_scope,
            checked_at: now_ms(),
        })
    }

    /// Return the change history for (agent, scope), oldest first.
    pub fn get_history(&self, agent_id: &str, scope: Option<&str>) -> Vec<TrustChangeRecord> {
        let scope = self.resolve_scope(scope);
        self.store.get_history(agent_id, scope)
    }

    /// Remove the assignment for (agent, scope). If `scope` is `None`, revoke
    /// every scope currently assigned to that agent.
    ///
    /// After revocation, `get_level` returns [`TRUST_LEVEL_MIN`] for the
    /// revoked (agent, scope) pair(s).
    pub fn revoke(&mut self, agent_id: &str, scope: Option<&str>) -> TrustResult<()> {
        validate_agent_id(agent_id)?;
        let now = now_ms();

        if let Some(scope) = scope {
            self.store.revoke(agent_id, scope, now);
            warn!(agent_id, scope, "trust revoked");
            return Ok(());
        }

        let scopes: Vec<String> = self
            .store
            .list_all()
            .into_iter()
            .filter(|a| a.agent_id == agent_id)
            .map(|a| a.scope)
            .collect();
        for scope in scopes {
            self.store.revoke(agent_id, &scope, now);
        }
        warn!(agent_id, "trust revoked across all scopes");
        Ok(())
    }

    /// All current (non-revoked) assignments.
    pub fn list_assignments(&self) -> Vec<TrustAssignment> {
        self.store.list_all()
    }
}
