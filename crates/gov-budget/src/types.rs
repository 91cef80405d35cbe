//! Core data types for spending envelopes, transactions, and queries.

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;

/// Recurring window an envelope's accumulators reset against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    /// Never resets.
    Total,
}

impl Period {
    /// Duration of one period in seconds, or `None` for [`Period::Total`].
    pub fn duration_seconds(self) -> Option<i64> {
        match self {
            Period::Hourly => Some(3_600),
            Period::Daily => Some(86_400),
            Period::Weekly => Some(604_800),
            Period::Monthly => Some(2_592_000),
            Period::Total => None,
        }
    }

    pub fn parse(value: &str) -> Result<Self, BudgetError> {
        match value {
            "hourly" => Ok(Period::Hourly),
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "total" => Ok(Period::Total),
            other => Err(BudgetError::InvalidPeriod(other.to_string())),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Period::Hourly => "hourly",
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Total => "total",
        };
        write!(f, "{s}")
    }
}

/// Live state of a budget envelope for one category.
///
/// `category` is the unique lookup key — creating a second envelope for the
/// same category replaces the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingEnvelope {
    pub id: String,
    pub category: String,
    pub limit: f64,
    pub period: Period,
    pub spent: f64,
    pub committed: f64,
    /// Wall-clock time in ms since Unix epoch at which the current period began.
    pub period_start: i64,
    pub suspended: bool,
}

/// An immutable record of completed spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub timestamp: i64,
    pub envelope_id: String,
}

/// An in-flight pre-authorisation held against an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCommit {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub created_at: i64,
}

/// Why a `check` call did or did not permit a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckReason {
    WithinBudget,
    ExceedsBudget,
    NoEnvelope,
    Suspended,
}

/// Result of a budget check. Read-only — never records a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCheckResult {
    pub permitted: bool,
    pub available: f64,
    pub requested: f64,
    pub limit: f64,
    pub spent: f64,
    pub committed: f64,
    pub reason: CheckReason,
}

/// Result of a commit (pre-authorisation) attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitResult {
    pub permitted: bool,
    pub commit_id: Option<String>,
    pub available: f64,
    pub requested: f64,
    pub reason: CheckReason,
}

/// Point-in-time utilization snapshot for one envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    pub category: String,
    pub envelope_id: String,
    pub limit: f64,
    pub spent: f64,
    pub committed: f64,
    pub available: f64,
    pub utilization_percent: f64,
    pub period: Period,
    pub period_start: i64,
    pub suspended: bool,
}

/// Optional filter applied to transaction queries. All fields are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl TransactionFilter {
    pub(crate) fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(category) = &self.category {
            if &transaction.category != category {
                return false;
            }
        }
        if let Some(since) = self.since {
            if transaction.timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if transaction.timestamp > until {
                return false;
            }
        }
        if let Some(min_amount) = self.min_amount {
            if transaction.amount < min_amount {
                return false;
            }
        }
        if let Some(max_amount) = self.max_amount {
            if transaction.amount > max_amount {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parses_wire_identifiers() {
        assert_eq!(Period::parse("hourly").unwrap(), Period::Hourly);
        assert_eq!(Period::parse("daily").unwrap(), Period::Daily);
        assert_eq!(Period::parse("weekly").unwrap(), Period::Weekly);
        assert_eq!(Period::parse("monthly").unwrap(), Period::Monthly);
        assert_eq!(Period::parse("total").unwrap(), Period::Total);
    }

    #[test]
    fn period_parse_rejects_unknown_identifiers() {
        let err = Period::parse("fortnightly").unwrap_err();
        assert!(matches!(err, BudgetError::InvalidPeriod(value) if value == "fortnightly"));
    }

    #[test]
    fn period_durations_match_spec_constants() {
        assert_eq!(Period::Hourly.duration_seconds(), Some(3_600));
        assert_eq!(Period::Daily.duration_seconds(), Some(86_400));
        assert_eq!(Period::Weekly.duration_seconds(), Some(604_800));
        assert_eq!(Period::Monthly.duration_seconds(), Some(2_592_000));
        assert_eq!(Period::Total.duration_seconds(), None);
    }
}
