//! Stateless decay computation.
//!
//! Decay is strictly one-directional: the effective level returned here is
//! never greater than the assigned level, and never below [`TRUST_LEVEL_MIN`].
//! These functions never mutate anything — callers record the resulting
//! history entry themselves.

use serde::{Deserialize, Serialize};

use crate::levels::{TRUST_LEVEL_MIN, TrustLevel};
use crate::types::TrustAssignment;

/// Decay configuration for a [`crate::TrustLadder`], fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecayPolicy {
    /// Effective level always equals the assigned level.
    None,
    /// Trust drops to the floor in one step once `ttl_ms` has elapsed since
    /// assignment. Never partial.
    Cliff { ttl_ms: i64 },
    /// Trust decreases by one level for every complete `step_ms` that has
    /// elapsed since assignment, floored at [`TRUST_LEVEL_MIN`].
    Gradual { step_ms: i64 },
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self::None
    }
}

/// The outcome of evaluating a [`DecayPolicy`] against one assignment at a
/// point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayResult {
    pub effective_level: TrustLevel,
    pub decayed_to_floor: bool,
}

/// Compute the effective trust level for `assignment` at `now_ms`.
pub fn compute_effective(policy: &DecayPolicy, assignment: &TrustAssignment, now_ms: i64) -> DecayResult {
    match policy {
        DecayPolicy::None => DecayResult {
            effective_level: assignment.assigned_level,
            decayed_to_floor: assignment.assigned_level == TRUST_LEVEL_MIN,
        },
        DecayPolicy::Cliff { ttl_ms } => apply_cliff(assignment, now_ms, *ttl_ms),
        DecayPolicy::Gradual { step_ms } => apply_gradual(assignment, now_ms, *step_ms),
    }
}

fn apply_cliff(assignment: &TrustAssignment, now_ms: i64, ttl_ms: i64) -> DecayResult {
    let elapsed = now_ms - assignment.assigned_at;
    if elapsed >= ttl_ms {
        DecayResult {
            effective_level: TRUST_LEVEL_MIN,
            decayed_to_floor: true,
        }
    } else {
        DecayResult {
            effective_level: assignment.assigned_level,
            decayed_to_floor: assignment.assigned_level == TRUST_LEVEL_MIN,
        }
    }
}

fn apply_gradual(assignment: &TrustAssignment, now_ms: i64, step_ms: i64) -> DecayResult {
    let elapsed = now_ms - assignment.assigned_at;
    let steps = if elapsed <= 0 { 0 } else { elapsed / step_ms };
    let raw = assignment.assigned_level.as_u8() as i64 - steps;
    let effective = TrustLevel::clamp_from_i64(raw);
    DecayResult {
        effective_level: effective,
        decayed_to_floor: effective == TRUST_LEVEL_MIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(level: TrustLevel, assigned_at: i64) -> TrustAssignment {
        TrustAssignment {
            agent_id: "a1".to_string(),
            scope: String::new(),
            assigned_level: level,
            assigned_at,
            reason: None,
            assigned_by: None,
        }
    }

    #[test]
    fn no_decay_is_identity() {
        let a = assignment(TrustLevel::ActAndReport, 0);
        let r = compute_effective(&DecayPolicy::None, &a, 1_000_000);
        assert_eq!(r.effective_level, TrustLevel::ActAndReport);
    }

    #[test]
    fn cliff_is_never_partial() {
        let a = assignment(TrustLevel::ActAndReport, 0);
        let policy = DecayPolicy::Cliff { ttl_ms: 60_000 };

        let before = compute_effective(&policy, &a, 59_999);
        assert_eq!(before.effective_level, TrustLevel::ActAndReport);
        assert!(!before.decayed_to_floor);

        let after = compute_effective(&policy, &a, 60_000);
        assert_eq!(after.effective_level, TRUST_LEVEL_MIN);
        assert!(after.decayed_to_floor);
    }

    #[test]
    fn gradual_steps_down_and_floors() {
        let a = assignment(TrustLevel::Autonomous, 0);
        let policy = DecayPolicy::Gradual { step_ms: 3_600_000 };

        assert_eq!(compute_effective(&policy, &a, 3_600_000).effective_level, TrustLevel::ActAndReport);
        assert_eq!(compute_effective(&policy, &a, 2 * 3_600_000).effective_level, TrustLevel::ActWithApproval);
        assert_eq!(compute_effective(&policy, &a, 5 * 3_600_000).effective_level, TRUST_LEVEL_MIN);
        assert_eq!(compute_effective(&policy, &a, 6 * 3_600_000).effective_level, TRUST_LEVEL_MIN);
    }

    #[test]
    fn decay_never_increases_level() {
        let a = assignment(TrustLevel::Suggest, 0);
        let policy = DecayPolicy::Gradual { step_ms: 1_000 };
        for t in [0, 500, 999, 1_000, 5_000, 1_000_000] {
            let effective = compute_effective(&policy, &a, t).effective_level;
            assert!(effective <= a.assigned_level);
        }
    }
}
