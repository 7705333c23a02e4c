//! Round-up calculation.
//!
//! All arithmetic is done in `Decimal`, so results are exact for decimal
//! inputs: rounding 4.55 up to the dollar yields exactly 5 and 0.45.

use rust_decimal::Decimal;

use super::error::RoundupError;
use super::policy::RoundupPolicy;
use super::types::{RoundupRequest, RoundupResult};

/// Stateless round-up calculator.
///
/// Safe to call from any number of threads; holds no state between calls.
pub struct RoundupCalculator;

impl RoundupCalculator {
    /// Computes the round-up of `amount` under the named rule.
    ///
    /// Ceiling semantics apply: an amount that is already a multiple of the
    /// rule's unit is returned unchanged with a zero round-up.
    ///
    /// # Errors
    ///
    /// - `RoundupError::InvalidPolicy` if the rule name is unknown
    /// - `RoundupError::InvalidIncrement` if `custom` lacks a positive increment
    /// - `RoundupError::InvalidAmount` if the amount is negative or overflows
    pub fn compute(
        amount: Decimal,
        rounding_rule: &str,
        custom_increment: Option<Decimal>,
    ) -> Result<RoundupResult, RoundupError> {
        let policy = RoundupPolicy::parse(rounding_rule, custom_increment)?;
        Self::apply(amount, policy)
    }

    /// Computes the round-up described by a request.
    ///
    /// # Errors
    ///
    /// See [`RoundupCalculator::compute`].
    pub fn calculate(request: &RoundupRequest) -> Result<RoundupResult, RoundupError> {
        Self::compute(
            request.amount,
            &request.rounding_rule,
            request.custom_rounding_amount,
        )
    }

    /// Computes the round-up of `amount` under an already parsed policy.
    ///
    /// # Errors
    ///
    /// Returns `RoundupError::InvalidIncrement` if the policy's unit is not
    /// positive, and `RoundupError::InvalidAmount` if the amount is negative
    /// or the rounded value does not fit in a `Decimal`.
    pub fn apply(amount: Decimal, policy: RoundupPolicy) -> Result<RoundupResult, RoundupError> {
        // `Custom` can be built without going through `RoundupPolicy::parse`.
        let unit = policy.unit();
        if unit <= Decimal::ZERO {
            return Err(RoundupError::InvalidIncrement);
        }
        validate_amount(amount)?;

        let rounded_amount = round_up_to_multiple(amount, unit)?;

        Ok(RoundupResult {
            original_amount: amount,
            rounded_amount,
            roundup_amount: rounded_amount - amount,
            rounding_rule_used: policy.name().to_string(),
        })
    }
}

/// Rejects amounts that cannot be a transaction charge.
fn validate_amount(amount: Decimal) -> Result<(), RoundupError> {
    if amount < Decimal::ZERO {
        return Err(RoundupError::InvalidAmount(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// Smallest multiple of `unit` that is >= `amount`. `unit` must be positive.
fn round_up_to_multiple(amount: Decimal, unit: Decimal) -> Result<Decimal, RoundupError> {
    let steps = amount
        .checked_div(unit)
        .ok_or_else(|| out_of_range(amount))?
        .ceil();

    let rounded = steps.checked_mul(unit).ok_or_else(|| out_of_range(amount))?;

    // Division keeps 28 significant digits; a quotient rounded down onto an
    // integer leaves us one unit short.
    let rounded = if rounded < amount {
        rounded.checked_add(unit).ok_or_else(|| out_of_range(amount))?
    } else {
        rounded
    };

    if rounded < amount {
        return Err(out_of_range(amount));
    }
    Ok(rounded)
}

fn out_of_range(amount: Decimal) -> RoundupError {
    RoundupError::InvalidAmount(format!("amount {amount} is out of range"))
}
