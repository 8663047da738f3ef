//! Rounding shared by every money amount on an order.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero. The result always
/// carries a scale of two, so `747` becomes `747.00` and is written to disk
/// that way.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use floor_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(476.2125)), dec!(476.21));
/// assert_eq!(round_half_up(dec!(222.525)), dec!(222.53));
/// assert_eq!(round_half_up(dec!(747)).to_string(), "747.00");
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
