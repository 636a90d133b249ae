//! Integer minor-unit split between merchant and platform.
//!
//! The platform share is the floor of `total * percent / 100`, computed on
//! the percentage's decimal mantissa and scale with `i128` arithmetic. The
//! merchant share is whatever remains, so the two shares always add up to
//! the total exactly.

use rust_decimal::Decimal;

use super::error::SplitError;

const HUNDRED: i128 = 100;

/// Splits `total_minor_units` into `(merchant, platform)` shares.
///
/// # Errors
///
/// Returns `SplitError::NegativeAmount` for a negative total,
/// `SplitError::PercentOutOfRange` when `platform_percent` is outside
/// `[0, 100]`, and `SplitError::Overflow` when the percentage carries so
/// many decimal places that the intermediate product cannot be represented.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pdv_core::split::split_amount;
///
/// // R$ 10.00 with a 1% platform fee
/// assert_eq!(split_amount(1000, dec!(1.0)), Ok((990, 10)));
/// // Floor rounding: the merchant keeps the leftover centavo
/// assert_eq!(split_amount(999, dec!(1.0)), Ok((990, 9)));
/// ```
pub fn split_amount(
    total_minor_units: i64,
    platform_percent: Decimal,
) -> Result<(i64, i64), SplitError> {
    if total_minor_units < 0 {
        return Err(SplitError::NegativeAmount(total_minor_units));
    }
    if platform_percent < Decimal::ZERO || platform_percent > Decimal::ONE_HUNDRED {
        return Err(SplitError::PercentOutOfRange(platform_percent));
    }

    // percent == mantissa / 10^scale, so
    // platform == total * mantissa / (100 * 10^scale)
    let percent = platform_percent.normalize();
    let mantissa = percent.mantissa().abs();
    let denominator = 10_i128
        .checked_pow(percent.scale())
        .and_then(|power| power.checked_mul(HUNDRED))
        .ok_or(SplitError::Overflow)?;
    let numerator = i128::from(total_minor_units)
        .checked_mul(mantissa)
        .ok_or(SplitError::Overflow)?;

    // Both operands are non-negative: integer division is the floor.
    let platform = i64::try_from(numerator / denominator).map_err(|_| SplitError::Overflow)?;
    let merchant = total_minor_units - platform;

    Ok((merchant, platform))
}
