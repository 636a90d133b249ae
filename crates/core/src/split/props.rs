//! Property-based tests for split computation.
//!
//! - Sum invariant: shares always add up to the total
//! - Boundaries: 0% and 100% give all to one side
//! - Determinism
//! - Monotonicity in the percentage

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::SplitCalculator;
use super::config::{MAX_PERCENT_SCALE, SplitConfiguration};
use super::money::split_amount;
use pdv_shared::types::Currency;

/// Strategy to generate totals in minor units (0 to 10^15 centavos).
fn total_minor_units() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000_000_000
}

/// Strategy to generate percentages in [0, 100] with up to 4 decimal places.
fn percent() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000, 0u32..=MAX_PERCENT_SCALE).prop_map(|(units, scale)| {
        // units / 10^4 is within [0, 100]; rescale keeps the value bounded.
        let value = Decimal::new(units, 4);
        value.round_dp(scale)
    })
}

/// Strategy to generate positive totals in major units with 2 decimals.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Shares are non-negative and add up to the total.
    #[test]
    fn prop_shares_sum_to_total(total in total_minor_units(), pct in percent()) {
        let (merchant, platform) = split_amount(total, pct).unwrap();
        prop_assert!(merchant >= 0);
        prop_assert!(platform >= 0);
        prop_assert_eq!(merchant + platform, total);
    }

    /// 0% leaves everything to the merchant, 100% to the platform.
    #[test]
    fn prop_boundaries(total in total_minor_units()) {
        prop_assert_eq!(split_amount(total, Decimal::ZERO).unwrap(), (total, 0));
        prop_assert_eq!(split_amount(total, Decimal::ONE_HUNDRED).unwrap(), (0, total));
    }

    /// Same arguments, same answer.
    #[test]
    fn prop_split_is_deterministic(total in total_minor_units(), pct in percent()) {
        prop_assert_eq!(split_amount(total, pct), split_amount(total, pct));
    }

    /// The platform share is the floor of the exact decimal product.
    #[test]
    fn prop_platform_share_is_floor(total in 0i64..10_000_000_000, pct in percent()) {
        let (_, platform) = split_amount(total, pct).unwrap();
        let exact = Decimal::from(total) * pct / Decimal::ONE_HUNDRED;
        prop_assert_eq!(Decimal::from(platform), exact.floor());
    }

    /// A larger percentage never gives the platform less.
    #[test]
    fn prop_platform_share_monotonic(
        total in total_minor_units(),
        a in percent(),
        b in percent(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let (_, p_low) = split_amount(total, low).unwrap();
        let (_, p_high) = split_amount(total, high).unwrap();
        prop_assert!(p_low <= p_high);
    }

    /// Every computed split satisfies the sum invariant in minor units.
    #[test]
    fn prop_compute_split_invariant(amount in positive_amount(), pct in percent()) {
        let config = SplitConfiguration::new(pct, Currency::Brl).unwrap();
        let split = SplitCalculator::compute_split("PIX-PROP", amount, &config).unwrap();
        prop_assert_eq!(
            split.merchant_amount() + split.platform_amount(),
            split.total_amount()
        );
        prop_assert_eq!(Decimal::new(split.total_amount(), 2), amount);
    }
}
