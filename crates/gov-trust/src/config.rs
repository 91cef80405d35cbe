//! Construction-time configuration for a [`crate::TrustLadder`].

use serde::{Deserialize, Serialize};

use crate::decay::DecayPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLadderConfig {
    /// Decay applied to every assignment managed by this ladder.
    pub decay: DecayPolicy,
    /// Scope used when callers pass `None`. Empty string = global scope.
    pub default_scope: String,
    /// Maximum history entries retained per (agent, scope) pair. 0 = unlimited.
    pub max_history_per_scope: usize,
}

impl Default for TrustLadderConfig {
    fn default() -> Self {
        Self {
            decay: DecayPolicy::None,
            default_scope: String::new(),
            max_history_per_scope: 1000,
        }
    }
}
