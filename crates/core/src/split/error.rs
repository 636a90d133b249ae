//! Split error types.
//!
//! Every variant is a malformed input: the caller must fix the argument,
//! retrying with the same values fails the same way.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while computing a split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Amount in minor units is negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(i64),

    /// Transaction total must be strictly positive.
    #[error("Transaction total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// Percentage outside the inclusive 0-100 range.
    #[error("Platform percentage must be between 0 and 100, got {0}")]
    PercentOutOfRange(Decimal),

    /// Percentage carries more decimal places than supported.
    #[error("Platform percentage {value} has more than {max_scale} decimal places")]
    PercentTooPrecise {
        /// The rejected percentage.
        value: Decimal,
        /// Maximum supported decimal places.
        max_scale: u32,
    },

    /// Transaction reference is empty or blank.
    #[error("Transaction reference cannot be empty")]
    EmptyReference,

    /// Total has more decimal places than the currency's minor unit.
    #[error("Amount {amount} cannot be expressed in minor units of {currency}")]
    SubMinorUnitAmount {
        /// The rejected amount.
        amount: Decimal,
        /// Currency code.
        currency: String,
    },

    /// Intermediate arithmetic exceeded the supported range.
    #[error("Amount and percentage exceed the supported numeric range")]
    Overflow,

    /// Stored shares do not add up to the stored total.
    #[error("Shares {merchant} + {platform} do not add up to total {total}")]
    InconsistentShares {
        /// Stored total in minor units.
        total: i64,
        /// Stored merchant share in minor units.
        merchant: i64,
        /// Stored platform share in minor units.
        platform: i64,
    },
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::NonPositiveTotal(_) => "NON_POSITIVE_TOTAL",
            Self::PercentOutOfRange(_) => "PERCENT_OUT_OF_RANGE",
            Self::PercentTooPrecise { .. } => "PERCENT_TOO_PRECISE",
            Self::EmptyReference => "EMPTY_REFERENCE",
            Self::SubMinorUnitAmount { .. } => "SUB_MINOR_UNIT_AMOUNT",
            Self::Overflow => "AMOUNT_OVERFLOW",
            Self::InconsistentShares { .. } => "INCONSISTENT_SHARES",
        }
    }
}
