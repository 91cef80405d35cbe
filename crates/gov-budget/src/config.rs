//! Construction-time configuration for a [`crate::BudgetEnforcer`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEnforcerConfig {
    /// When true, `record` proceeds even when the amount exceeds available
    /// balance instead of failing with `BudgetExceeded`. `check` still
    /// reports `ExceedsBudget` regardless.
    pub allow_overdraft: bool,
    /// When true, unspent capacity rolls into the next period's limit,
    /// capped at twice the envelope's configured limit.
    pub rollover_on_reset: bool,
}

impl Default for BudgetEnforcerConfig {
    fn default() -> Self {
        Self {
            allow_overdraft: false,
            rollover_on_reset: false,
        }
    }
}
