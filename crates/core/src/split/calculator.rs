//! Split calculator.
//!
//! Turns an approved payment (reference + total in major units) into an
//! immutable `SplitResult` using a configuration snapshot.

use pdv_shared::types::{Currency, Money};
use rust_decimal::Decimal;
use serde::Serialize;

use super::config::{PlatformPercent, SplitConfiguration};
use super::error::SplitError;
use super::money::split_amount;

/// The division of one payment between merchant and platform.
///
/// `merchant_amount + platform_amount == total_amount` holds for every
/// value of this type. Fields are private; the only constructors are the
/// calculator and [`SplitResult::from_parts`], both of which check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitResult {
    transaction_reference: String,
    currency: Currency,
    total_amount: i64,
    merchant_amount: i64,
    platform_amount: i64,
    platform_percent: PlatformPercent,
}

impl SplitResult {
    /// Rebuilds a split from stored values, re-checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is blank, an amount is negative,
    /// the percentage is invalid, or the shares do not add up to the total.
    pub fn from_parts(
        transaction_reference: impl Into<String>,
        currency: Currency,
        total_amount: i64,
        merchant_amount: i64,
        platform_amount: i64,
        platform_percent: Decimal,
    ) -> Result<Self, SplitError> {
        let transaction_reference = transaction_reference.into();
        if transaction_reference.trim().is_empty() {
            return Err(SplitError::EmptyReference);
        }
        for amount in [total_amount, merchant_amount, platform_amount] {
            if amount < 0 {
                return Err(SplitError::NegativeAmount(amount));
            }
        }
        if merchant_amount.checked_add(platform_amount) != Some(total_amount) {
            return Err(SplitError::InconsistentShares {
                total: total_amount,
                merchant: merchant_amount,
                platform: platform_amount,
            });
        }

        Ok(Self {
            transaction_reference,
            currency,
            total_amount,
            merchant_amount,
            platform_amount,
            platform_percent: PlatformPercent::new(platform_percent)?,
        })
    }

    /// Opaque reference of the originating transaction.
    #[must_use]
    pub fn transaction_reference(&self) -> &str {
        &self.transaction_reference
    }

    /// Currency of all amounts.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Payment total in minor units.
    #[must_use]
    pub const fn total_amount(&self) -> i64 {
        self.total_amount
    }

    /// Merchant share in minor units.
    #[must_use]
    pub const fn merchant_amount(&self) -> i64 {
        self.merchant_amount
    }

    /// Platform share in minor units.
    #[must_use]
    pub const fn platform_amount(&self) -> i64 {
        self.platform_amount
    }

    /// Platform percentage the split was computed with.
    #[must_use]
    pub const fn platform_percent(&self) -> Decimal {
        self.platform_percent.value()
    }

    /// Merchant percentage the split was computed with.
    #[must_use]
    pub fn merchant_percent(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.platform_percent.value()
    }

    /// Payment total as money.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::from_minor_units(self.total_amount, self.currency)
    }

    /// Merchant share as money.
    #[must_use]
    pub fn merchant_share(&self) -> Money {
        Money::from_minor_units(self.merchant_amount, self.currency)
    }

    /// Platform share as money.
    #[must_use]
    pub fn platform_share(&self) -> Money {
        Money::from_minor_units(self.platform_amount, self.currency)
    }
}

/// Split calculator.
///
/// Holds no state: identical inputs always produce identical results, and
/// deduplicating repeated references is left to the ledger.
pub struct SplitCalculator;

impl SplitCalculator {
    /// Computes the split of an approved payment.
    ///
    /// `total_amount` is in major units of `config.currency` (e.g. `10.00`
    /// reais) and must be exactly representable in minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is blank, the total is not
    /// positive, or the total has sub-minor-unit precision.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pdv_core::split::{SplitCalculator, SplitConfiguration};
    /// use pdv_shared::types::Currency;
    ///
    /// let config = SplitConfiguration::new(dec!(1), Currency::Brl).unwrap();
    /// let split = SplitCalculator::compute_split("PIX-0001", dec!(10.00), &config).unwrap();
    /// assert_eq!(split.merchant_amount(), 990);
    /// assert_eq!(split.platform_amount(), 10);
    /// ```
    pub fn compute_split(
        transaction_reference: &str,
        total_amount: Decimal,
        config: &SplitConfiguration,
    ) -> Result<SplitResult, SplitError> {
        let reference = transaction_reference.trim();
        if reference.is_empty() {
            return Err(SplitError::EmptyReference);
        }
        if total_amount <= Decimal::ZERO {
            return Err(SplitError::NonPositiveTotal(total_amount));
        }

        let total = Money::new(total_amount, config.currency)
            .to_minor_units()
            .ok_or_else(|| SplitError::SubMinorUnitAmount {
                amount: total_amount,
                currency: config.currency.to_string(),
            })?;

        let (merchant_amount, platform_amount) =
            split_amount(total, config.platform_percent.value())?;

        Ok(SplitResult {
            transaction_reference: reference.to_string(),
            currency: config.currency,
            total_amount: total,
            merchant_amount,
            platform_amount,
            platform_percent: config.platform_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(percent: Decimal) -> SplitConfiguration {
        SplitConfiguration::new(percent, Currency::Brl).unwrap()
    }

    #[test]
    fn test_compute_split_basic() {
        let split = SplitCalculator::compute_split("PIX-1", dec!(10.00), &config(dec!(1))).unwrap();
        assert_eq!(split.transaction_reference(), "PIX-1");
        assert_eq!(split.total_amount(), 1000);
        assert_eq!(split.merchant_amount(), 990);
        assert_eq!(split.platform_amount(), 10);
        assert_eq!(split.platform_percent(), dec!(1));
        assert_eq!(split.merchant_percent(), dec!(99));
        assert_eq!(split.platform_share().amount, dec!(0.10));
        assert_eq!(split.merchant_share().amount, dec!(9.90));
    }

    #[test]
    fn test_compute_split_floor_rounding() {
        let split = SplitCalculator::compute_split("PIX-2", dec!(9.99), &config(dec!(1))).unwrap();
        assert_eq!(split.merchant_amount(), 990);
        assert_eq!(split.platform_amount(), 9);
        assert_eq!(split.merchant_amount() + split.platform_amount(), 999);
    }

    #[test]
    fn test_reference_is_trimmed() {
        let split = SplitCalculator::compute_split("  PIX-3 \n", dec!(1), &config(dec!(1))).unwrap();
        assert_eq!(split.transaction_reference(), "PIX-3");
    }

    #[test]
    fn test_same_inputs_same_result() {
        let cfg = config(dec!(2.75));
        let a = SplitCalculator::compute_split("PIX-4", dec!(123.45), &cfg).unwrap();
        let b = SplitCalculator::compute_split("PIX-4", dec!(123.45), &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_reference_rejected() {
        assert_eq!(
            SplitCalculator::compute_split("   ", dec!(10), &config(dec!(1))),
            Err(SplitError::EmptyReference)
        );
    }

    #[test]
    fn test_non_positive_total_rejected() {
        assert_eq!(
            SplitCalculator::compute_split("PIX-5", dec!(0), &config(dec!(1))),
            Err(SplitError::NonPositiveTotal(dec!(0)))
        );
        assert_eq!(
            SplitCalculator::compute_split("PIX-5", dec!(-5.00), &config(dec!(1))),
            Err(SplitError::NonPositiveTotal(dec!(-5.00)))
        );
    }

    #[test]
    fn test_sub_centavo_total_rejected() {
        assert!(matches!(
            SplitCalculator::compute_split("PIX-6", dec!(10.005), &config(dec!(1))),
            Err(SplitError::SubMinorUnitAmount { .. })
        ));
    }

    #[test]
    fn test_from_parts_checks_invariant() {
        assert!(SplitResult::from_parts("PIX-7", Currency::Brl, 1000, 990, 10, dec!(1)).is_ok());
        assert_eq!(
            SplitResult::from_parts("PIX-7", Currency::Brl, 1000, 990, 11, dec!(1)),
            Err(SplitError::InconsistentShares {
                total: 1000,
                merchant: 990,
                platform: 11,
            })
        );
        assert_eq!(
            SplitResult::from_parts("", Currency::Brl, 1000, 990, 10, dec!(1)),
            Err(SplitError::EmptyReference)
        );
        assert_eq!(
            SplitResult::from_parts("PIX-7", Currency::Brl, 1000, 1010, -10, dec!(1)),
            Err(SplitError::NegativeAmount(-10))
        );
    }
}
