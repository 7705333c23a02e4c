//! Period summaries over recorded round-ups.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::error::RoundupError;
use super::types::{RoundupRecord, RoundupSummary, RuleStats};

/// Longest period a summary may cover (ten years).
pub const MAX_SUMMARY_DAYS: i64 = 3650;

/// Start of the trailing window of `days` ending at `now`.
#[must_use]
pub fn period_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// Adds a round-up to a running total.
///
/// # Errors
///
/// Returns `RoundupError::InvalidAmount` when the total leaves the `Decimal` range.
pub fn add_roundup(total: Decimal, roundup: Decimal) -> Result<Decimal, RoundupError> {
    total
        .checked_add(roundup)
        .ok_or_else(|| RoundupError::InvalidAmount("round-up total is out of range".to_string()))
}

/// Aggregates the records that fall within `[now - days, now]`.
///
/// Records outside the window are ignored, so callers may pass a superset.
///
/// # Errors
///
/// Returns `RoundupError::InvalidAmount` if a total does not fit in a `Decimal`.
pub fn summarize(
    records: &[RoundupRecord],
    days: i64,
    now: DateTime<Utc>,
) -> Result<RoundupSummary, RoundupError> {
    let start_date = period_start(now, days);

    let mut total_roundup = Decimal::ZERO;
    let mut total_transactions = 0u64;
    let mut rounding_rule_stats = BTreeMap::<String, RuleStats>::new();

    for record in records
        .iter()
        .filter(|r| r.created_at >= start_date && r.created_at <= now)
    {
        total_roundup = add_roundup(total_roundup, record.roundup_amount)?;
        total_transactions += 1;

        let stats = rounding_rule_stats
            .entry(record.rounding_rule.clone())
            .or_default();
        stats.count += 1;
        stats.total = add_roundup(stats.total, record.roundup_amount)?;
    }

    // The mean of non-negative values never exceeds their sum.
    let average_roundup = if total_transactions == 0 {
        Decimal::ZERO
    } else {
        (total_roundup / Decimal::from(total_transactions)).round_dp(4)
    };

    Ok(RoundupSummary {
        period_days: days,
        total_roundup,
        total_transactions,
        average_roundup,
        rounding_rule_stats,
        start_date,
        end_date: now,
    })
}
