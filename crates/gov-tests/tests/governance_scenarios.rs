//! End-to-end scenarios spanning the trust, budget, consent, and audit
//! crates through a single [`GovernanceEngine`].

use std::thread::sleep;
use std::time::Duration;

use gov_audit::{AuditFilter, AuditStorage, FileAuditStore};
use gov_budget::Period;
use gov_consent::ConsentConfig;
use gov_engine::{Action, GovernanceConfig, GovernanceEngine, Outcome};
use gov_trust::{DecayPolicy, TrustLadderConfig};

fn permissive_config() -> GovernanceConfig {
    GovernanceConfig {
        consent: ConsentConfig { default_deny: false },
        ..Default::default()
    }
}

#[tokio::test]
async fn straight_allow_emits_single_allow_record() {
    let engine = GovernanceEngine::new(permissive_config());
    engine.trust().assign("writer", 4, None, None, None).unwrap();
    engine.budget().create_envelope("llm_calls", 50.0, Period::Daily);

    let action = Action::new("writer")
        .with_required_trust_level(3)
        .with_scope("default")
        .with_budget("llm_calls", 2.5);

    let decision = engine.evaluate(action).await.unwrap();
    assert_eq!(decision.outcome, Outcome::Allow);
    assert!(decision.allowed);

    let records = engine.audit_records(&AuditFilter::default()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].permitted);
}

#[tokio::test]
async fn trust_failure_short_circuits_before_budget_is_consulted() {
    let engine = GovernanceEngine::new(permissive_config());
    engine.trust().assign("intern", 1, None, None, None).unwrap();
    // Deliberately no envelope for "prod_spend" — if budget were reached,
    // the engine would panic-free deny for a different reason, masking a
    // short-circuit bug. One reason in the decision proves trust alone ran.
    let action = Action::new("intern").with_required_trust_level(4).with_budget("prod_spend", 9.0);

    let decision = engine.evaluate(action).await.unwrap();
    assert_eq!(decision.outcome, Outcome::Deny);
    assert_eq!(decision.reasons.len(), 1);
    assert!(decision.reasons[0].contains("trust check"));

    let records = engine.audit_records(&AuditFilter::default()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].permitted);
    assert!(records[0].budget_used.is_none());
}

#[tokio::test]
async fn cliff_decay_drops_straight_to_the_floor() {
    let config = GovernanceConfig {
        trust: TrustLadderConfig { decay: DecayPolicy::Cliff { ttl_ms: 40 }, ..Default::default() },
        ..permissive_config()
    };
    let engine = GovernanceEngine::new(config);
    engine.trust().assign("agent-c", 5, None, None, None).unwrap();

    let before = engine.trust().check("agent-c", 5, None).unwrap();
    assert!(before.permitted);

    sleep(Duration::from_millis(60));

    let after = engine.trust().check("agent-c", 1, None).unwrap();
    assert!(!after.permitted);
    assert_eq!(after.effective, gov_trust::TRUST_LEVEL_MIN);

    let decision = engine.evaluate(Action::new("agent-c").with_required_trust_level(1)).await.unwrap();
    assert_eq!(decision.outcome, Outcome::Deny);
}

#[tokio::test]
async fn gradual_decay_steps_down_one_level_at_a_time() {
    let config = GovernanceConfig {
        trust: TrustLadderConfig { decay: DecayPolicy::Gradual { step_ms: 30 }, ..Default::default() },
        ..permissive_config()
    };
    let engine = GovernanceEngine::new(config);
    engine.trust().assign("agent-g", 5, None, None, None).unwrap();

    let immediate = engine.trust().get_level("agent-g", None).unwrap();
    assert_eq!(immediate, gov_trust::TrustLevel::Autonomous);

    sleep(Duration::from_millis(40));
    let after_one_step = engine.trust().get_level("agent-g", None).unwrap();
    assert_eq!(after_one_step, gov_trust::TrustLevel::ActAndReport);

    sleep(Duration::from_millis(60));
    let after_more_steps = engine.trust().get_level("agent-g", None).unwrap();
    assert!(after_more_steps < after_one_step);
}

#[tokio::test]
async fn commit_then_release_frees_the_reservation() {
    let engine = GovernanceEngine::new(permissive_config());
    engine.budget().create_envelope("infra", 100.0, Period::Monthly);

    let commit = engine.budget().commit("infra", 70.0);
    assert!(commit.permitted);
    let commit_id = commit.commit_id.unwrap();

    let blocked = engine.budget().check("infra", 40.0);
    assert!(!blocked.permitted);
    assert_eq!(blocked.available, 30.0);

    engine.budget().release(&commit_id);

    let freed = engine.budget().check("infra", 40.0);
    assert!(freed.permitted);

    let action = Action::new("billing-bot").with_budget("infra", 40.0);
    let decision = engine.evaluate(action).await.unwrap();
    assert_eq!(decision.outcome, Outcome::Allow);
}

#[tokio::test]
async fn tampering_a_stored_record_is_detected_at_its_index() {
    let engine = GovernanceEngine::new(permissive_config());
    engine.trust().assign("a1", 5, None, None, None).unwrap();

    for _ in 0..3 {
        let action = Action::new("a1").with_required_trust_level(2);
        engine.evaluate(action).await.unwrap();
    }

    let intact = engine.verify_audit_chain().await.unwrap();
    assert!(intact.is_valid());

    // Corrupt the middle record's agent_id directly through a fresh chain
    // walk: re-fetch, mutate in place, and re-verify against the mutated
    // slice to confirm the break is reported at the tampered index.
    let mut records = engine.audit_records(&AuditFilter::default()).await.unwrap();
    records[1].agent_id = "someone-else".to_string();
    let result = gov_audit::HashChain::verify(&records);
    match result {
        gov_audit::ChainVerificationResult::Failure { broken_at, .. } => assert_eq!(broken_at, 1),
        gov_audit::ChainVerificationResult::Success { .. } => panic!("tampering was not detected"),
    }
}

#[tokio::test]
async fn file_backed_audit_store_round_trips_and_stays_canonical_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.ndjson");

    let engine = GovernanceEngine::with_storage(permissive_config(), Box::new(FileAuditStore::new(&path)));
    engine.trust().assign("a1", 5, None, None, None).unwrap();

    for _ in 0..3 {
        let action = Action::new("a1").with_required_trust_level(2);
        engine.evaluate(action).await.unwrap();
    }

    let verified = engine.verify_audit_chain().await.unwrap();
    assert!(verified.is_valid());

    // A fresh store pointed at the same file must see the same records —
    // proving they actually landed on disk rather than only in memory.
    let reopened = FileAuditStore::new(&path);
    let reloaded = reopened.query(&AuditFilter::default()).await.unwrap();
    assert_eq!(reloaded.len(), 3);

    let contents = std::fs::read_to_string(&path).unwrap();
    for line in contents.lines().filter(|l| !l.is_empty()) {
        assert!(!line.contains("null"), "canonical lines must omit absent optionals, got: {line}");
    }
}
