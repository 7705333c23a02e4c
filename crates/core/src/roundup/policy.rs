//! Rounding policies.

use rust_decimal::Decimal;

use super::error::RoundupError;

/// Strategy that decides the rounding unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundupPolicy {
    /// Round up to the next whole currency unit.
    Dollar,
    /// Round up to the next 0.25 increment.
    Quarter,
    /// Round up to the next multiple of a caller-supplied increment.
    ///
    /// `parse` only builds it with a positive increment; a variant built
    /// directly with any other increment is rejected by `RoundupCalculator::apply`.
    Custom(Decimal),
}

impl RoundupPolicy {
    /// Unit of the quarter policy.
    pub const QUARTER_UNIT: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

    /// Parses a rounding rule name, case-insensitively.
    ///
    /// `custom_increment` is only consulted for `custom`, where it must be
    /// present and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `RoundupError::InvalidPolicy` for unknown names and
    /// `RoundupError::InvalidIncrement` for a missing or non-positive
    /// custom increment.
    pub fn parse(name: &str, custom_increment: Option<Decimal>) -> Result<Self, RoundupError> {
        match name.to_lowercase().as_str() {
            "dollar" => Ok(Self::Dollar),
            "quarter" => Ok(Self::Quarter),
            "custom" => match custom_increment {
                Some(increment) if increment > Decimal::ZERO => Ok(Self::Custom(increment)),
                _ => Err(RoundupError::InvalidIncrement),
            },
            _ => Err(RoundupError::InvalidPolicy(name.to_string())),
        }
    }

    /// Normalized (lower-case) rule name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Dollar => "dollar",
            Self::Quarter => "quarter",
            Self::Custom(_) => "custom",
        }
    }

    /// The rounding unit; the rounded amount is always a multiple of it.
    #[must_use]
    pub const fn unit(&self) -> Decimal {
        match self {
            Self::Dollar => Decimal::ONE,
            Self::Quarter => Self::QUARTER_UNIT,
            Self::Custom(increment) => *increment,
        }
    }

    /// Increment worth recording alongside a calculation.
    #[must_use]
    pub const fn custom_increment(&self) -> Option<Decimal> {
        match self {
            Self::Custom(increment) => Some(*increment),
            Self::Dollar | Self::Quarter => None,
        }
    }
}

impl std::fmt::Display for RoundupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
