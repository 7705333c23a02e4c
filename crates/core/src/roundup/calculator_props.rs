//! Property-based tests for the round-up calculator.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use untether_shared::types::{RoundupId, UserId};

use super::calculator::RoundupCalculator;
use super::error::RoundupError;
use super::policy::RoundupPolicy;
use super::summary::summarize;
use super::types::{RoundupRecord, RoundupStatus};

/// Strategy to generate amounts from 0.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate custom increments from 0.01 to 100.00.
fn increment() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate any positive `Decimal`, up to `Decimal::MAX`, at any scale.
fn any_positive_decimal() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), 0u32..=28)
        .prop_filter("mantissa must be non-zero", |(lo, mid, hi, _)| {
            (*lo | *mid | *hi) != 0
        })
        .prop_map(|(lo, mid, hi, scale)| Decimal::from_parts(lo, mid, hi, false, scale))
}

fn calculated(roundup_amount: Decimal, now: DateTime<Utc>) -> RoundupRecord {
    RoundupRecord {
        id: RoundupId::new(),
        user_id: Some(UserId::new()),
        transaction_id: None,
        amount: Decimal::ZERO,
        rounding_rule: "custom".to_string(),
        custom_rounding_amount: None,
        rounded_amount: roundup_amount,
        roundup_amount,
        status: RoundupStatus::Calculated,
        created_at: now,
    }
}

/// Strategy to generate any policy.
fn policy() -> impl Strategy<Value = RoundupPolicy> {
    prop_oneof![
        Just(RoundupPolicy::Dollar),
        Just(RoundupPolicy::Quarter),
        increment().prop_map(RoundupPolicy::Custom),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// roundup = rounded - original, and is never negative.
    #[test]
    fn prop_roundup_is_difference_and_non_negative(amount in amount(), policy in policy()) {
        let result = RoundupCalculator::apply(amount, policy).unwrap();

        prop_assert_eq!(result.roundup_amount, result.rounded_amount - result.original_amount);
        prop_assert!(result.roundup_amount >= Decimal::ZERO);
        prop_assert_eq!(result.original_amount, amount);
    }

    /// The rounded amount is a multiple of the policy unit.
    #[test]
    fn prop_rounded_is_multiple_of_unit(amount in amount(), policy in policy()) {
        let result = RoundupCalculator::apply(amount, policy).unwrap();

        prop_assert_eq!(result.rounded_amount % policy.unit(), Decimal::ZERO);
    }

    /// The round-up is strictly less than one unit (ceiling, not "next higher").
    #[test]
    fn prop_roundup_below_one_unit(amount in amount(), policy in policy()) {
        let result = RoundupCalculator::apply(amount, policy).unwrap();

        prop_assert!(result.roundup_amount < policy.unit());
    }

    /// Exact multiples of the unit are left unchanged.
    #[test]
    fn prop_exact_multiple_has_zero_roundup(steps in 0i64..1_000_000, policy in policy()) {
        let amount = policy.unit() * Decimal::from(steps);
        let result = RoundupCalculator::apply(amount, policy).unwrap();

        prop_assert_eq!(result.roundup_amount, Decimal::ZERO);
        prop_assert_eq!(result.rounded_amount, amount);
    }

    /// Same input, same output.
    #[test]
    fn prop_calculation_is_idempotent(amount in amount(), policy in policy()) {
        let first = RoundupCalculator::apply(amount, policy).unwrap();
        let second = RoundupCalculator::apply(amount, policy).unwrap();

        prop_assert_eq!(first, second);
    }

    /// The reported rule is the lower-cased input name.
    #[test]
    fn prop_rule_used_is_lowercased_input(
        amount in amount(),
        name in prop::sample::select(vec!["dollar", "DOLLAR", "Quarter", "qUARTER"]),
    ) {
        let result = RoundupCalculator::compute(amount, name, None).unwrap();

        prop_assert_eq!(result.rounding_rule_used, name.to_lowercase());
    }

    /// Negative amounts are always rejected.
    #[test]
    fn prop_negative_amounts_rejected(cents in 1i64..100_000_000, policy in policy()) {
        prop_assert!(RoundupCalculator::apply(Decimal::new(-cents, 2), policy).is_err());
    }

    /// Any positive increment and amount either rounds up consistently or is
    /// reported as out of range.
    #[test]
    fn prop_full_range_custom_increment_never_panics(
        amount in prop_oneof![Just(Decimal::ZERO), any_positive_decimal()],
        increment in any_positive_decimal(),
    ) {
        match RoundupCalculator::apply(amount, RoundupPolicy::Custom(increment)) {
            Ok(result) => {
                prop_assert!(result.rounded_amount >= amount);
                prop_assert!(result.roundup_amount >= Decimal::ZERO);
                prop_assert_eq!(result.roundup_amount, result.rounded_amount - amount);
            }
            Err(e) => prop_assert!(matches!(e, RoundupError::InvalidAmount(_))),
        }
    }

    /// Summaries report an out-of-range total instead of overflowing.
    #[test]
    fn prop_summary_total_is_checked(
        roundups in prop::collection::vec(any_positive_decimal(), 1..6),
    ) {
        let now = Utc::now();
        let records: Vec<_> = roundups.iter().map(|r| calculated(*r, now)).collect();
        let expected = roundups
            .iter()
            .try_fold(Decimal::ZERO, |total, r| total.checked_add(*r));

        match summarize(&records, 30, now) {
            Ok(summary) => {
                prop_assert_eq!(Some(summary.total_roundup), expected);
                prop_assert_eq!(summary.total_transactions, roundups.len() as u64);
            }
            Err(e) => {
                prop_assert!(expected.is_none());
                prop_assert!(matches!(e, RoundupError::InvalidAmount(_)));
            }
        }
    }
}
