//! Top-level configuration composing every subsystem's construction config.

use serde::{Deserialize, Serialize};

use gov_budget::BudgetEnforcerConfig;
use gov_consent::ConsentConfig;
use gov_trust::TrustLadderConfig;

/// Configuration for the audit subsystem. `max_records` and `include_context`
/// are recording-only knobs for hosts that lay an eviction or redaction
/// policy over the in-memory backend; the hash chain itself never evicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub max_records: usize,
    pub include_context: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { max_records: 10_000, include_context: true }
    }
}

/// Top-level configuration for a [`crate::GovernanceEngine`]. All fields
/// have sensible defaults — pass `GovernanceConfig::default()` to get a
/// strict, default-deny, non-decaying, non-overdrafting engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub trust: TrustLadderConfig,
    pub budget: BudgetEnforcerConfig,
    pub consent: ConsentConfig,
    pub audit: AuditConfig,
}
