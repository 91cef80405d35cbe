//! Period-reset and balance arithmetic for [`SpendingEnvelope`].
//!
//! These functions are pure given a `now_ms` and never perform I/O; the
//! enforcer is responsible for persisting whatever they mutate.

use crate::types::{Period, SpendingEnvelope};

/// Whether the envelope's current period window has elapsed as of `now_ms`.
pub(crate) fn is_period_expired(envelope: &SpendingEnvelope, now_ms: i64) -> bool {
    let Some(duration) = envelope.period.duration_seconds() else {
        return false;
    };
    let elapsed_ms = now_ms - envelope.period_start;
    elapsed_ms >= duration * 1_000
}

/// Reset the envelope's accumulators and advance `period_start` by whole
/// periods if the current window has elapsed. `base_limit` is the limit the
/// envelope was created with — rollover math anchors to it, not to whatever
/// `envelope.limit` happens to hold from a prior rollover.
///
/// Returns true if a reset occurred.
pub(crate) fn refresh_period(
    envelope: &mut SpendingEnvelope,
    base_limit: f64,
    rollover_on_reset: bool,
    now_ms: i64,
) -> bool {
    let Some(duration) = envelope.period.duration_seconds() else {
        return false;
    };
    let duration_ms = duration * 1_000;
    let elapsed_ms = now_ms - envelope.period_start;

    if elapsed_ms < duration_ms {
        return false;
    }

    let periods_elapsed = elapsed_ms / duration_ms;
    let previous_spent = envelope.spent;

    envelope.period_start += periods_elapsed * duration_ms;
    envelope.spent = 0.0;
    envelope.committed = 0.0;
    envelope.limit = if rollover_on_reset {
        let unspent = (base_limit - previous_spent).max(0.0);
        (base_limit + unspent).min(base_limit * 2.0)
    } else {
        base_limit
    };

    true
}

/// How much of the limit remains available for new spending.
pub(crate) fn available_balance(envelope: &SpendingEnvelope) -> f64 {
    (envelope.limit - envelope.spent - envelope.committed).max(0.0)
}

/// Utilization as a percentage (0–100+, unbounded above when overdrawn).
pub(crate) fn utilization_percent(envelope: &SpendingEnvelope) -> f64 {
    if envelope.limit == 0.0 {
        return 100.0;
    }
    ((envelope.spent + envelope.committed) / envelope.limit) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(period: Period, limit: f64, period_start: i64) -> SpendingEnvelope {
        SpendingEnvelope {
            id: "e1".to_string(),
            category: "llm".to_string(),
            limit,
            period,
            spent: 0.0,
            committed: 0.0,
            period_start,
            suspended: false,
        }
    }

    #[test]
    fn total_period_never_expires() {
        let e = envelope(Period::Total, 100.0, 0);
        assert!(!is_period_expired(&e, i64::MAX / 2));
    }

    #[test]
    fn refresh_advances_by_whole_periods_no_drift() {
        let mut e = envelope(Period::Hourly, 100.0, 0);
        e.spent = 40.0;
        // 2.5 hours elapsed — only 2 whole periods should be consumed.
        let reset = refresh_period(&mut e, 100.0, false, 2 * 3_600_000 + 1_800_000);
        assert!(reset);
        assert_eq!(e.period_start, 2 * 3_600_000);
        assert_eq!(e.spent, 0.0);
        assert_eq!(e.committed, 0.0);
    }

    #[test]
    fn refresh_is_noop_before_period_elapses() {
        let mut e = envelope(Period::Daily, 100.0, 0);
        e.spent = 10.0;
        let reset = refresh_period(&mut e, 100.0, false, 86_399_000);
        assert!(!reset);
        assert_eq!(e.spent, 10.0);
    }

    #[test]
    fn rollover_caps_at_double_base_limit() {
        let mut e = envelope(Period::Daily, 100.0, 0);
        e.spent = 10.0; // 90 unspent, capped capacity would be 190 but cap is 200
        refresh_period(&mut e, 100.0, true, 86_400_000);
        assert_eq!(e.limit, 190.0);

        let mut e2 = envelope(Period::Daily, 100.0, 0);
        e2.spent = 0.0; // 100 unspent -> 200, at the cap exactly
        refresh_period(&mut e2, 100.0, true, 86_400_000);
        assert_eq!(e2.limit, 200.0);
    }

    #[test]
    fn no_rollover_restores_base_limit() {
        let mut e = envelope(Period::Daily, 100.0, 0);
        e.limit = 150.0; // carried over from a prior rollover period
        e.spent = 5.0;
        refresh_period(&mut e, 100.0, false, 86_400_000);
        assert_eq!(e.limit, 100.0);
    }

    #[test]
    fn available_balance_never_negative() {
        let mut e = envelope(Period::Total, 100.0, 0);
        e.spent = 80.0;
        e.committed = 40.0;
        assert_eq!(available_balance(&e), 0.0);
    }
}
