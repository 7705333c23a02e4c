//! Round-up data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use untether_shared::types::{RoundupId, UserId};

/// A single calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundupRequest {
    /// Original transaction amount.
    pub amount: Decimal,
    /// Rounding rule name, matched case-insensitively.
    pub rounding_rule: String,
    /// Increment for the `custom` rule; ignored otherwise.
    pub custom_rounding_amount: Option<Decimal>,
}

impl RoundupRequest {
    /// Creates a request for a named rule.
    #[must_use]
    pub fn new(amount: Decimal, rounding_rule: impl Into<String>) -> Self {
        Self {
            amount,
            rounding_rule: rounding_rule.into(),
            custom_rounding_amount: None,
        }
    }

    /// Sets the increment used by the `custom` rule.
    #[must_use]
    pub fn with_custom_increment(mut self, increment: Decimal) -> Self {
        self.custom_rounding_amount = Some(increment);
        self
    }
}

/// Outcome of a successful calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundupResult {
    /// Echo of the input amount.
    pub original_amount: Decimal,
    /// Smallest multiple of the rule's unit that is >= the original amount.
    pub rounded_amount: Decimal,
    /// `rounded_amount - original_amount`, never negative.
    pub roundup_amount: Decimal,
    /// Lower-cased rule name that was applied.
    pub rounding_rule_used: String,
}

/// Lifecycle state of a recorded round-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundupStatus {
    /// Computed for display only.
    Calculated,
    /// Earmarked for transfer to savings.
    Pending,
}

/// Audit record stored after a successful calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundupRecord {
    /// Record ID.
    pub id: RoundupId,
    /// Owning user, if the calculation was made on behalf of one.
    pub user_id: Option<UserId>,
    /// Caller's reference for the source transaction.
    pub transaction_id: Option<String>,
    /// Original transaction amount.
    pub amount: Decimal,
    /// Normalized rule name.
    pub rounding_rule: String,
    /// Increment, only for the `custom` rule.
    pub custom_rounding_amount: Option<Decimal>,
    /// Rounded target amount.
    pub rounded_amount: Decimal,
    /// Spare change.
    pub roundup_amount: Decimal,
    /// Record status.
    pub status: RoundupStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Returned when a user's transaction is rounded up for savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundupReceipt {
    /// ID of the pending record.
    pub roundup_id: RoundupId,
    /// Spare change set aside.
    pub amount_rounded: Decimal,
}

/// One transaction in a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTransaction {
    /// Caller's transaction reference.
    pub id: Option<String>,
    /// Transaction amount; non-positive amounts are skipped.
    pub amount: Decimal,
}

/// Input for a batch calculation. One rule applies to every transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRoundupInput {
    /// Transactions to round up.
    pub transactions: Vec<BatchTransaction>,
    /// Rounding rule name.
    pub rounding_rule: String,
    /// Increment for the `custom` rule.
    pub custom_rounding_amount: Option<Decimal>,
}

/// Per-transaction batch outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemResult {
    /// Caller's transaction reference.
    pub transaction_id: Option<String>,
    /// Original amount.
    pub original_amount: Decimal,
    /// Rounded amount.
    pub rounded_amount: Decimal,
    /// Spare change.
    pub roundup_amount: Decimal,
}

/// Outcome of a batch calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRoundupResult {
    /// Number of transactions that were rounded (skipped ones excluded).
    pub processed_transactions: usize,
    /// Sum of all round-up amounts.
    pub total_roundup: Decimal,
    /// Individual results in input order.
    pub results: Vec<BatchItemResult>,
}

/// Count and total for one rounding rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStats {
    /// Number of calculations.
    pub count: u64,
    /// Sum of round-up amounts.
    pub total: Decimal,
}

/// Round-up totals over a trailing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundupSummary {
    /// Length of the period in days.
    pub period_days: i64,
    /// Sum of round-up amounts.
    pub total_roundup: Decimal,
    /// Number of calculations in the period.
    pub total_transactions: u64,
    /// Mean round-up, 4 decimal places; zero for an empty period.
    pub average_roundup: Decimal,
    /// Stats keyed by rule name.
    pub rounding_rule_stats: BTreeMap<String, RuleStats>,
    /// Period start.
    pub start_date: DateTime<Utc>,
    /// Period end.
    pub end_date: DateTime<Utc>,
}
