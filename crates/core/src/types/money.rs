//! Money helpers.
//!
//! Prices are stored as `NUMERIC(10,2)` and handled as [`Decimal`] everywhere;
//! the store trades in a single currency (EUR), so there is no currency field.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to cents, half away from zero.
///
/// ```
/// use freshmarket_core::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(2_745, 3)), Decimal::new(275, 2));
/// ```
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_midpoint() {
        assert_eq!(round_money(Decimal::new(1_005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(1_004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn test_round_money_keeps_scale() {
        assert_eq!(round_money(Decimal::new(399, 2)).to_string(), "3.99");
    }
}
