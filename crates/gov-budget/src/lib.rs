//! Static-limit spending budgets with two-phase commit/release reservation.
//!
//! One [`SpendingEnvelope`] per category tracks a limit over a recurring
//! [`Period`]. [`BudgetEnforcer::check`] is a pure read; [`BudgetEnforcer::record`]
//! books completed spend; [`BudgetEnforcer::commit`]/[`BudgetEnforcer::release`]
//! reserve capacity for an in-flight operation without booking it as spent.
//! Period resets are lazy — the first access after a window elapses zeroes
//! the accumulators and advances `period_start` by whole periods.

#![forbid(unsafe_code)]

mod config;
mod enforcer;
mod envelope;
mod error;
mod types;

pub use config::BudgetEnforcerConfig;
pub use enforcer::BudgetEnforcer;
pub use error::{BudgetError, BudgetResult};
pub use types::{
    BudgetCheckResult, BudgetUtilization, CheckReason, CommitResult, PendingCommit, Period,
    SpendingEnvelope, Transaction, TransactionFilter,
};
