//! [`ConsentChecker`] — the primary entry point for this crate.

use tracing::{info, warn};

use crate::config::ConsentConfig;
use crate::error::{ConsentError, ConsentResult};
use crate::store::ConsentStore;
use crate::types::{ConsentCheckResult, ConsentRecord};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn require_non_empty(value: &str, err: ConsentError) -> ConsentResult<()> {
    if value.trim().is_empty() { Err(err) } else { Ok(()) }
}

/// Manages explicit consent grants controlling agent access to data types.
///
/// Consent is always recorded explicitly by a human or trusted orchestrator
/// — there is no proactive suggestion or inference. A new `ConsentChecker`
/// starts empty.
pub struct ConsentChecker {
    config: ConsentConfig,
    store: ConsentStore,
}

impl ConsentChecker {
    pub fn new(config: ConsentConfig) -> Self {
        Self { config, store: ConsentStore::new() }
    }

    /// Record explicit consent for an agent to access a data type.
    ///
    /// Replaces any existing record for the same (`agent_id`, `data_type`,
    /// `purpose`). Pass `purpose = None` to record blanket consent covering
    /// every purpose for that agent + data type pair.
    pub fn record(
        &mut self,
        agent_id: &str,
        data_type: &str,
        purpose: Option<&str>,
        granted_by: &str,
        expires_at: Option<i64>,
    ) -> ConsentResult<ConsentRecord> {
        require_non_empty(agent_id, ConsentError::InvalidAgentId)?;
        require_non_empty(data_type, ConsentError::InvalidDataType)?;
        require_non_empty(granted_by, ConsentError::InvalidGrantedBy)?;

        let record = ConsentRecord {
            agent_id: agent_id.to_string(),
            data_type: data_type.to_string(),
            purpose: purpose.map(str::to_string),
            granted_by: granted_by.to_string(),
            granted_at: now_ms(),
            expires_at,
        };
        self.store.put(record.clone());
        info!(agent_id, data_type, ?purpose, granted_by, "consent recorded");
        Ok(record)
    }

    /// Check whether consent has been granted for a data access. Read-only.
    ///
    /// A blanket consent record (`purpose=None`) satisfies any purpose
    /// check. Expired records are treated as absent. On absence, the
    /// outcome is controlled by [`ConsentConfig::default_deny`].
    pub fn check(&self, agent_id: &str, data_type: &str, purpose: Option<&str>) -> ConsentCheckResult {
        let now = now_ms();
        if let Some(record) = self.store.find(agent_id, data_type, purpose, now) {
            let purpose_text = purpose.map(|p| format!(" for purpose '{p}'")).unwrap_or_default();
            return ConsentCheckResult {
                granted: true,
                agent_id: agent_id.to_string(),
                data_type: data_type.to_string(),
                purpose: purpose.map(str::to_string),
                reason: format!(
                    "consent granted for agent '{agent_id}' to access '{data_type}'{purpose_text} (granted by '{}')",
                    record.granted_by
                ),
                record: Some(record.clone()),
            };
        }

        let purpose_text = purpose.map(|p| format!(" for purpose '{p}'")).unwrap_or_default();
        if self.config.default_deny {
            ConsentCheckResult {
                granted: false,
                agent_id: agent_id.to_string(),
                data_type: data_type.to_string(),
                purpose: purpose.map(str::to_string),
                reason: format!(
                    "no valid consent record found for agent '{agent_id}' accessing '{data_type}'{purpose_text}; defaulting to deny"
                ),
                record: None,
            }
        } else {
            ConsentCheckResult {
                granted: true,
                agent_id: agent_id.to_string(),
                data_type: data_type.to_string(),
                purpose: purpose.map(str::to_string),
                reason: format!(
                    "no explicit consent record for agent '{agent_id}' accessing '{data_type}'{purpose_text}; permissive mode allows by default"
                ),
                record: None,
            }
        }
    }

    /// Revoke a single consent record. `purpose = None` revokes the blanket
    /// record, not every purpose for that agent + data type — use
    /// [`ConsentChecker::revoke_all_for_agent`] for that.
    pub fn revoke(&mut self, agent_id: &str, data_type: &str, purpose: Option<&str>) -> ConsentResult<()> {
        let removed = self.store.remove(agent_id, data_type, purpose);
        if !removed {
            return Err(ConsentError::ConsentNotFound {
                agent_id: agent_id.to_string(),
                data_type: data_type.to_string(),
                purpose: purpose.map(str::to_string),
            });
        }
        warn!(agent_id, data_type, ?purpose, "consent revoked");
        Ok(())
    }

    /// Revoke every consent record for an agent. Returns the count removed.
    pub fn revoke_all_for_agent(&mut self, agent_id: &str) -> usize {
        let count = self.store.remove_all_for_agent(agent_id);
        warn!(agent_id, count, "all consent revoked for agent");
        count
    }

    /// All consent records for an agent, including expired ones.
    pub fn list_for_agent(&self, agent_id: &str) -> Vec<ConsentRecord> {
        self.store.list_for_agent(agent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ConsentChecker {
        ConsentChecker::new(ConsentConfig::default())
    }

    #[test]
    fn exact_purpose_match_grants() {
        let mut c = checker();
        c.record("a1", "user_profile", Some("support"), "admin", None).unwrap();
        let result = c.check("a1", "user_profile", Some("support"));
        assert!(result.granted);
        assert!(result.record.is_some());
    }

    #[test]
    fn blanket_consent_covers_any_purpose() {
        let mut c = checker();
        c.record("a1", "user_profile", None, "admin", None).unwrap();
        assert!(c.check("a1", "user_profile", Some("support")).granted);
        assert!(c.check("a1", "user_profile", Some("billing")).granted);
    }

    #[test]
    fn specific_purpose_does_not_cover_other_purposes() {
        let mut c = checker();
        c.record("a1", "user_profile", Some("support"), "admin", None).unwrap();
        assert!(!c.check("a1", "user_profile", Some("billing")).granted);
    }

    #[test]
    fn default_deny_on_absence() {
        let c = checker();
        let result = c.check("a1", "user_profile", None);
        assert!(!result.granted);
        assert!(result.record.is_none());
    }

    #[test]
    fn permissive_mode_allows_on_absence() {
        let c = ConsentChecker::new(ConsentConfig { default_deny: false });
        let result = c.check("a1", "user_profile", None);
        assert!(result.granted);
        assert!(result.record.is_none());
    }

    #[test]
    fn expired_record_treated_as_absent() {
        let mut c = checker();
        c.record("a1", "user_profile", None, "admin", Some(1)).unwrap();
        // now_ms() is always far past 1ms since epoch.
        assert!(!c.check("a1", "user_profile", None).granted);
    }

    #[test]
    fn revoke_unknown_record_fails() {
        let mut c = checker();
        let err = c.revoke("a1", "user_profile", None).unwrap_err();
        assert!(matches!(err, ConsentError::ConsentNotFound { .. }));
    }

    #[test]
    fn revoke_all_for_agent_removes_every_record() {
        let mut c = checker();
        c.record("a1", "user_profile", Some("support"), "admin", None).unwrap();
        c.record("a1", "billing_info", None, "admin", None).unwrap();
        c.record("a2", "user_profile", None, "admin", None).unwrap();

        let removed = c.revoke_all_for_agent("a1");
        assert_eq!(removed, 2);
        assert!(c.list_for_agent("a1").is_empty());
        assert_eq!(c.list_for_agent("a2").len(), 1);
    }

    #[test]
    fn validation_rejects_empty_fields() {
        let mut c = checker();
        assert_eq!(
            c.record("", "dt", None, "admin", None).unwrap_err(),
            ConsentError::InvalidAgentId
        );
        assert_eq!(
            c.record("a1", "", None, "admin", None).unwrap_err(),
            ConsentError::InvalidDataType
        );
        assert_eq!(
            c.record("a1", "dt", None, "", None).unwrap_err(),
            ConsentError::InvalidGrantedBy
        );
    }
}
