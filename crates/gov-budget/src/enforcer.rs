//! [`BudgetEnforcer`] — the primary entry point for this crate.

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::BudgetEnforcerConfig;
use crate::envelope::{available_balance, refresh_period, utilization_percent};
use crate::error::{BudgetError, BudgetResult};
use crate::types::{
    BudgetCheckResult, BudgetUtilization, CheckReason, CommitResult, PendingCommit, Period,
    SpendingEnvelope, Transaction, TransactionFilter,
};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Economic governance gate for agent spending.
///
/// Design contract:
/// - Limits are static; only the caller changes them, by calling
///   [`BudgetEnforcer::create_envelope`] again for the same category.
/// - [`BudgetEnforcer::check`] is read-only. It never records a transaction
///   or mutates state.
/// - [`BudgetEnforcer::record`] deducts from the envelope. Call it only
///   after the protected operation has completed.
/// - [`BudgetEnforcer::commit`] pre-authorises an amount, reducing available
///   balance without touching `spent`. Release it with
///   [`BudgetEnforcer::release`] if the operation is cancelled.
/// - Period reset is automatic and lazy: it happens on the first access
///   after a window has elapsed.
pub struct BudgetEnforcer {
    config: BudgetEnforcerConfig,
    envelopes: HashMap<String, SpendingEnvelope>,
    /// The limit each envelope was created with — rollover math anchors to
    /// this rather than to `envelope.limit`, which rollover itself mutates.
    base_limits: HashMap<String, f64>,
    transactions: Vec<Transaction>,
    commits: HashMap<String, PendingCommit>,
}

impl BudgetEnforcer {
    pub fn new(config: BudgetEnforcerConfig) -> Self {
        Self {
            config,
            envelopes: HashMap::new(),
            base_limits: HashMap::new(),
            transactions: Vec::new(),
            commits: HashMap::new(),
        }
    }

    /// Create a spending envelope. Overwrites any existing envelope for the
    /// same category, starting a fresh period with zeroed accumulators.
    pub fn create_envelope(&mut self, category: &str, limit: f64, period: Period) -> SpendingEnvelope {
        let envelope = SpendingEnvelope {
            id: Uuid::new_v4().to_string(),
            category: category.to_string(),
            limit,
            period,
            spent: 0.0,
            committed: 0.0,
            period_start: now_ms(),
            suspended: false,
        };
        self.envelopes.insert(category.to_string(), envelope.clone());
        self.base_limits.insert(category.to_string(), limit);
        info!(category, limit, period = %period, "envelope created");
        envelope
    }

    /// Suspend an envelope — every `check` returns `permitted=false,
    /// reason=Suspended` until resumed.
    pub fn suspend(&mut self, category: &str) -> BudgetResult<()> {
        let envelope = self.require_envelope_mut(category)?;
        envelope.suspended = true;
        Ok(())
    }

    pub fn resume(&mut self, category: &str) -> BudgetResult<()> {
        let envelope = self.require_envelope_mut(category)?;
        envelope.suspended = false;
        Ok(())
    }

    /// Check whether a transaction is within budget. Read-only.
    pub fn check(&mut self, category: &str, amount: f64) -> BudgetCheckResult {
        let base_limit = self.base_limits.get(category).copied();
        let Some(envelope) = self.envelopes.get_mut(category) else {
            return BudgetCheckResult {
                permitted: false,
                available: 0.0,
                requested: amount,
                limit: 0.0,
                spent: 0.0,
                committed: 0.0,
                reason: CheckReason::NoEnvelope,
            };
        };

        refresh_period(envelope, base_limit.unwrap_or(envelope.limit), self.config.rollover_on_reset, now_ms());

        if envelope.suspended {
            return BudgetCheckResult {
                permitted: false,
                available: 0.0,
                requested: amount,
                limit: envelope.limit,
                spent: envelope.spent,
                committed: envelope.committed,
                reason: CheckReason::Suspended,
            };
        }

        let available = available_balance(envelope);
        let permitted = amount <= available;

        BudgetCheckResult {
            permitted,
            available,
            requested: amount,
            limit: envelope.limit,
            spent: envelope.spent,
            committed: envelope.committed,
            reason: if permitted {
                CheckReason::WithinBudget
            } else {
                CheckReason::ExceedsBudget
            },
        }
    }

    /// Record a completed transaction, deducting it from the envelope.
    ///
    /// Fails with `NoEnvelope` if the category is unknown, `BudgetExceeded`
    /// if the amount exceeds availability and overdraft is disabled.
    /// `NonPositiveAmount` if `amount <= 0`.
    pub fn record(
        &mut self,
        category: &str,
        amount: f64,
        description: Option<String>,
    ) -> BudgetResult<Transaction> {
        if amount <= 0.0 {
            return Err(BudgetError::NonPositiveAmount(amount));
        }

        let check = self.check(category, amount);
        if check.reason == CheckReason::NoEnvelope {
            return Err(BudgetError::NoEnvelope(category.to_string()));
        }
        if !check.permitted && !self.config.allow_overdraft {
            return Err(BudgetError::BudgetExceeded {
                category: category.to_string(),
                requested: amount,
                available: check.available,
            });
        }

        let envelope = self.require_envelope_mut(category)?;
        envelope.spent += amount;

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            category: category.to_string(),
            amount,
            description,
            timestamp: now_ms(),
            envelope_id: envelope.id.clone(),
        };
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Pre-authorise an amount against the envelope, reserving it in
    /// `committed` without touching `spent`.
    pub fn commit(&mut self, category: &str, amount: f64) -> CommitResult {
        let check = self.check(category, amount);
        if !check.permitted {
            return CommitResult {
                permitted: false,
                commit_id: None,
                available: check.available,
                requested: amount,
                reason: check.reason,
            };
        }

        let commit_id = Uuid::new_v4().to_string();
        let envelope = self
            .envelopes
            .get_mut(category)
            .expect("check() returning permitted guarantees the envelope exists");
        envelope.committed += amount;
        let available = available_balance(envelope);

        self.commits.insert(
            commit_id.clone(),
            PendingCommit {
                id: commit_id.clone(),
                category: category.to_string(),
                amount,
                created_at: now_ms(),
            },
        );

        CommitResult {
            permitted: true,
            commit_id: Some(commit_id),
            available,
            requested: amount,
            reason: CheckReason::WithinBudget,
        }
    }

    /// Release a previously committed amount back to available. Idempotent
    /// — unknown ids are a no-op.
    pub fn release(&mut self, commit_id: &str) {
        let Some(commit) = self.commits.remove(commit_id) else {
            return;
        };
        if let Some(envelope) = self.envelopes.get_mut(&commit.category) {
            envelope.committed = (envelope.committed - commit.amount).max(0.0);
        }
        warn!(commit_id, category = %commit.category, amount = commit.amount, "commit released");
    }

    /// Point-in-time utilization snapshot for one category.
    pub fn utilization(&mut self, category: &str) -> BudgetResult<BudgetUtilization> {
        self.require_envelope_mut(category)?;
        let base_limit = self.base_limits.get(category).copied().unwrap_or(0.0);
        let rollover = self.config.rollover_on_reset;
        let envelope = self.envelopes.get_mut(category).expect("checked above");
        refresh_period(envelope, base_limit, rollover, now_ms());

        Ok(BudgetUtilization {
            category: envelope.category.clone(),
            envelope_id: envelope.id.clone(),
            limit: envelope.limit,
            spent: envelope.spent,
            committed: envelope.committed,
            available: available_balance(envelope),
            utilization_percent: utilization_percent(envelope),
            period: envelope.period,
            period_start: envelope.period_start,
            suspended: envelope.suspended,
        })
    }

    pub fn list_envelopes(&self) -> Vec<SpendingEnvelope> {
        self.envelopes.values().cloned().collect()
    }

    pub fn get_transactions(&self, filter: Option<&TransactionFilter>) -> Vec<Transaction> {
        match filter {
            None => self.transactions.clone(),
            Some(filter) => self
                .transactions
                .iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect(),
        }
    }

    fn require_envelope_mut(&mut self, category: &str) -> BudgetResult<&mut SpendingEnvelope> {
        self.envelopes
            .get_mut(category)
            .ok_or_else(|| BudgetError::NoEnvelope(category.to_string()))
    }
}
