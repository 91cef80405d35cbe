//! Core data types for governance evaluation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Describes one action submitted for governance evaluation.
///
/// All fields except `agent_id` are optional — the engine skips the check
/// for any field left unset. Provide only what the action actually needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub agent_id: String,
    pub required_trust_level: Option<i64>,
    pub scope: Option<String>,
    pub budget_category: Option<String>,
    pub budget_amount: Option<f64>,
    pub data_type: Option<String>,
    pub purpose: Option<String>,
    pub action_type: Option<String>,
    pub resource: Option<String>,
    pub extra: HashMap<String, serde_json::Value>,
}

impl Action {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self { agent_id: agent_id.into(), ..Default::default() }
    }

    pub fn with_required_trust_level(mut self, level: i64) -> Self {
        self.required_trust_level = Some(level);
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_budget(mut self, category: impl Into<String>, amount: f64) -> Self {
        self.budget_category = Some(category.into());
        self.budget_amount = Some(amount);
        self
    }

    pub fn with_consent(mut self, data_type: impl Into<String>, purpose: Option<String>) -> Self {
        self.data_type = Some(data_type.into());
        self.purpose = purpose;
        self
    }
}

/// Final disposition of a governance evaluation. The pipeline currently
/// only ever produces `Allow` or `Deny`; `AllowWithCaveat` is reserved for
/// a future partial-allow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Allow,
    Deny,
    AllowWithCaveat,
}

impl Outcome {
    fn is_allowed(self) -> bool {
        matches!(self, Self::Allow | Self::AllowWithCaveat)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::AllowWithCaveat => "allow_with_caveat",
        };
        write!(f, "{s}")
    }
}

/// The engine's structured response to one [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub allowed: bool,
    pub reasons: Vec<String>,
    pub audit_record_id: Uuid,
    pub action: Action,
}

impl Decision {
    pub(crate) fn new(outcome: Outcome, reasons: Vec<String>, audit_record_id: Uuid, action: Action) -> Self {
        Self { allowed: outcome.is_allowed(), outcome, reasons, audit_record_id, action }
    }
}
