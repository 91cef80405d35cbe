//! Construction-time configuration for a [`crate::ConsentChecker`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// When true, absence of an explicit consent record is treated as a
    /// denial. When false (permissive mode, not recommended in production),
    /// absence is treated as an approval.
    pub default_deny: bool,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self { default_deny: true }
    }
}
