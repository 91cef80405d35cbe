//! [`GovernanceEngine`] — composes the trust, budget, consent, and audit
//! subsystems into one sequential evaluation pipeline.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use uuid::Uuid;

use gov_audit::{AuditEntry, AuditStorage, HashChain, MemoryAuditStore};
use gov_budget::BudgetEnforcer;
use gov_consent::ConsentChecker;
use gov_trust::TrustLadder;

use crate::config::GovernanceConfig;
use crate::error::GovernanceResult;
use crate::types::{Action, Decision, Outcome};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Composes [`TrustLadder`], [`BudgetEnforcer`], [`ConsentChecker`], and a
/// hash-chained audit log into a single evaluation pipeline.
///
/// Evaluation is strictly sequential — trust, then budget, then consent —
/// and short-circuits to `Deny` on the first failing check that an `Action`
/// requests. Exactly one [`gov_audit::AuditRecord`] is appended per
/// evaluation, regardless of which step (if any) denied it. The engine
/// performs no cross-protocol optimisation: each check sees only the
/// `Action` fields relevant to it, and never mutates trust, budget, or
/// consent state as a side effect — spend must be recorded explicitly by
/// the caller after the protected operation completes.
///
/// All methods take `&self`; every subsystem is guarded by its own mutex,
/// so a `GovernanceEngine` can be shared behind an `Arc` across concurrent
/// callers. Audit appends in particular are serialised through one mutex
/// guarding the `(HashChain, AuditStorage)` pair, satisfying the
/// single-writer discipline the chain's integrity depends on.
pub struct GovernanceEngine {
    trust: Mutex<TrustLadder>,
    budget: Mutex<BudgetEnforcer>,
    consent: Mutex<ConsentChecker>,
    audit: Mutex<(HashChain, Box<dyn AuditStorage>)>,
}

impl GovernanceEngine {
    /// Construct an engine backed by a volatile in-memory audit store.
    pub fn new(config: GovernanceConfig) -> Self {
        Self::with_storage(config, Box::new(MemoryAuditStore::new()))
    }

    /// Construct an engine backed by a caller-supplied audit storage
    /// backend, starting the hash chain at the genesis hash.
    pub fn with_storage(config: GovernanceConfig, storage: Box<dyn AuditStorage>) -> Self {
        Self::with_storage_and_tip(config, storage, HashChain::new())
    }

    /// Construct an engine restoring the hash chain at a known tip — use
    /// this when resuming against a non-empty [`gov_audit::FileAuditStore`],
    /// seeded from e.g. [`gov_audit::FileAuditStore::read_last_line_sync`].
    pub fn with_storage_and_tip(config: GovernanceConfig, storage: Box<dyn AuditStorage>, chain: HashChain) -> Self {
        Self {
            trust: Mutex::new(TrustLadder::new(config.trust)),
            budget: Mutex::new(BudgetEnforcer::new(config.budget)),
            consent: Mutex::new(ConsentChecker::new(config.consent)),
            audit: Mutex::new((chain, storage)),
        }
    }

    pub fn trust(&self) -> parking_lot::MutexGuard<'_, TrustLadder> {
        self.trust.lock()
    }

    pub fn budget(&self) -> parking_lot::MutexGuard<'_, BudgetEnforcer> {
        self.budget.lock()
    }

    pub fn consent(&self) -> parking_lot::MutexGuard<'_, ConsentChecker> {
        self.consent.lock()
    }

    /// Query the audit log without needing to reach into storage directly.
    pub async fn audit_records(&self, filter: &gov_audit::AuditFilter) -> GovernanceResult<Vec<gov_audit::AuditRecord>> {
        let guard = self.audit.lock();
        Ok(guard.1.query(filter).await?)
    }

    /// Re-derive every hash in the chain against its stored record and
    /// report the first discrepancy, if any.
    pub async fn verify_audit_chain(&self) -> GovernanceResult<gov_audit::ChainVerificationResult> {
        let guard = self.audit.lock();
        let records = guard.1.all().await?;
        Ok(HashChain::verify(&records))
    }

    /// Evaluate one action through the pipeline: trust, then budget, then
    /// consent, short-circuiting to `Deny` on the first requested check
    /// that fails. Exactly one audit record is appended either way.
    pub async fn evaluate(&self, action: Action) -> GovernanceResult<Decision> {
        let mut reasons = Vec::new();
        let mut trust_level = None;
        let mut budget_used = None;
        let mut budget_remaining = None;

        let outcome = 'pipeline: {
            if let Some(required_level) = action.required_trust_level {
                let result = self.trust.lock().check(&action.agent_id, required_level, action.scope.as_deref())?;
                trust_level = Some(result.effective.as_u8() as i64);
                reasons.push(format!(
                    "trust check: agent '{}' effective level {} {} required level {}",
                    action.agent_id,
                    result.effective,
                    if result.permitted { ">=" } else { "<" },
                    result.required,
                ));
                if !result.permitted {
                    break 'pipeline Outcome::Deny;
                }
            }

            if let Some(category) = &action.budget_category {
                let amount = action.budget_amount.unwrap_or(0.0);
                let result = self.budget.lock().check(category, amount);
                budget_used = Some(amount);
                budget_remaining = Some(result.available);
                reasons.push(format!(
                    "budget check: category '{category}' requested {amount} against available {} ({:?})",
                    result.available, result.reason
                ));
                if !result.permitted {
                    break 'pipeline Outcome::Deny;
                }
            }

            if let Some(data_type) = &action.data_type {
                let result = self.consent.lock().check(&action.agent_id, data_type, action.purpose.as_deref());
                reasons.push(result.reason.clone());
                if !result.granted {
                    break 'pipeline Outcome::Deny;
                }
            }

            Outcome::Allow
        };

        let entry = AuditEntry {
            agent_id: action.agent_id.clone(),
            action: action.action_type.clone().unwrap_or_else(|| "evaluate".to_string()),
            permitted: outcome == Outcome::Allow,
            trust_level,
            required_level: action.required_trust_level,
            budget_used,
            budget_remaining,
            reason: (!reasons.is_empty()).then(|| reasons.join("; ")),
            metadata: build_metadata(&action),
        };

        let record_id = Uuid::new_v4();
        let timestamp = now_ms();

        // Build the candidate record against the current tip without
        // advancing it, persist it, and only then commit the tip — a
        // storage failure must never leave the chain pointing at a hash
        // nothing durable backs.
        let record = {
            let mut guard = self.audit.lock();
            let (chain, storage) = &mut *guard;
            let candidate = chain.prepare(entry, record_id, timestamp);
            storage.append(candidate.clone()).await?;
            chain.commit(candidate.record_hash.clone());
            candidate
        };

        Ok(Decision::new(outcome, reasons, record.id, action))
    }

    /// Synchronous wrapper for [`GovernanceEngine::evaluate`]. Spins up a
    /// dedicated single-threaded runtime for the duration of the call, the
    /// same run-to-completion semantics callers get from repeatedly calling
    /// an `asyncio.run`-style entry point.
    pub fn evaluate_sync(&self, action: Action) -> GovernanceResult<Decision> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("building a current-thread runtime cannot fail absent resource exhaustion");
        runtime.block_on(self.evaluate(action))
    }
}

fn build_metadata(action: &Action) -> Option<Value> {
    let mut map = Map::new();
    if let Some(scope) = &action.scope {
        map.insert("scope".to_string(), Value::String(scope.clone()));
    }
    if let Some(resource) = &action.resource {
        map.insert("resource".to_string(), Value::String(resource.clone()));
    }
    if let Some(category) = &action.budget_category {
        map.insert("budget_category".to_string(), Value::String(category.clone()));
    }
    if let Some(data_type) = &action.data_type {
        map.insert("data_type".to_string(), Value::String(data_type.clone()));
    }
    if let Some(purpose) = &action.purpose {
        map.insert("purpose".to_string(), Value::String(purpose.clone()));
    }
    if !action.extra.is_empty() {
        map.insert("extra".to_string(), Value::Object(action.extra.clone().into_iter().collect()));
    }
    (!map.is_empty()).then_some(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gov_budget::Period;

    fn engine() -> GovernanceEngine {
        GovernanceEngine::new(GovernanceConfig::default())
    }

    #[tokio::test]
    async fn straight_allow() {
        let engine = engine();
        engine.trust().assign("a1", 3, None, None, None).unwrap();
        engine.budget().create_envelope("llm", 100.0, Period::Daily);
        engine.consent().record("a1", "user", Some("support"), "admin", None).unwrap();

        let action = Action::new("a1")
            .with_required_trust_level(2)
            .with_budget("llm", 5.0)
            .with_consent("user", Some("support".to_string()));

        let decision = engine.evaluate(action).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.outcome, Outcome::Allow);
        assert_eq!(decision.reasons.len(), 3);
    }

    #[tokio::test]
    async fn trust_short_circuit_skips_budget() {
        let engine = engine();
        engine.trust().assign("a1", 1, None, None, None).unwrap();
        // No envelope created for "llm" — if budget were checked this
        // would also deny, masking whether short-circuit actually happened.
        let action = Action::new("a1").with_required_trust_level(3).with_budget("llm", 5.0);

        let decision = engine.evaluate(action).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reasons.len(), 1);
        assert!(decision.reasons[0].contains("trust check"));
    }

    #[tokio::test]
    async fn one_record_per_evaluation() {
        let engine = engine();
        engine.trust().assign("a1", 0, None, None, None).unwrap();
        let action = Action::new("a1").with_required_trust_level(5);
        engine.evaluate(action).await.unwrap();

        let guard = engine.audit.lock();
        let (_, storage) = &*guard;
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[test]
    fn evaluate_sync_matches_evaluate() {
        let engine = engine();
        engine.trust().assign("a1", 5, None, None, None).unwrap();
        let action = Action::new("a1").with_required_trust_level(2);
        let decision = engine.evaluate_sync(action).unwrap();
        assert!(decision.allowed);
    }
}
