//! Cart pricing: subtotal, delivery fee, and discounts.
//!
//! The same rules price the member cart at order time and the guest cart at
//! checkout, so they live here rather than in a handler.
//!
//! # Rules
//!
//! - `subtotal` = Σ unit price × quantity
//! - `delivery_fee` = flat fee, waived for members whose subtotal reaches the
//!   free-delivery threshold
//! - `discount` = member percentage for members; guests may use the
//!   `WELCOME10` promo code instead
//! - `total` = subtotal + delivery fee − discount
//!
//! Every component is rounded to cents before it is summed, so the parts
//! shown to the customer always add up to the total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ProductId, round_money};

/// Promo code accepted for guests.
pub const WELCOME_PROMO_CODE: &str = "WELCOME10";

/// Errors produced while pricing a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// There is nothing to price.
    #[error("cart is empty")]
    EmptyCart,

    /// A line has a zero quantity.
    #[error("invalid quantity for product {0}")]
    InvalidQuantity(ProductId),

    /// A line has a negative unit price.
    #[error("invalid price for product {0}")]
    InvalidPrice(ProductId),

    /// The promo code is not recognised.
    #[error("unknown promo code: {0}")]
    UnknownPromoCode(String),
}

/// Whether the customer is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerKind {
    /// Not signed in; pays delivery, may use a promo code.
    Guest,
    /// Signed in; gets the member discount and free delivery above the threshold.
    Member,
}

/// Which discount, if any, was applied to a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[default]
    None,
    Member,
    Promo,
}

/// One priced line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingLine {
    pub product_id: ProductId,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl PricingLine {
    /// Unit price × quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Store-wide pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Flat delivery fee.
    pub delivery_fee: Decimal,
    /// Member subtotal at or above which delivery is free.
    pub free_delivery_threshold: Decimal,
    /// Member discount, in percent of the subtotal.
    pub member_discount_percent: Decimal,
    /// Discount granted by [`WELCOME_PROMO_CODE`], in percent.
    pub welcome_promo_percent: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(599, 2),
            free_delivery_threshold: Decimal::new(60, 0),
            member_discount_percent: Decimal::new(5, 0),
            welcome_promo_percent: Decimal::new(10, 0),
        }
    }
}

/// Priced breakdown of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub item_count: u32,
    pub free_delivery: bool,
    pub discount_kind: DiscountKind,
}

impl PricingPolicy {
    /// Price a set of cart lines.
    ///
    /// `promo_code` is only honoured for guests; members always get the
    /// member discount and a code is ignored. Blank codes count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::EmptyCart`] if `lines` is empty,
    /// [`PricingError::InvalidQuantity`] / [`PricingError::InvalidPrice`] for
    /// malformed lines, and [`PricingError::UnknownPromoCode`] for a guest code
    /// that is not recognised.
    pub fn quote(
        &self,
        lines: &[PricingLine],
        customer: CustomerKind,
        promo_code: Option<&str>,
    ) -> Result<Quote, PricingError> {
        if lines.is_empty() {
            return Err(PricingError::EmptyCart);
        }

        let mut raw_subtotal = Decimal::ZERO;
        let mut item_count: u32 = 0;
        for line in lines {
            if line.quantity == 0 {
                return Err(PricingError::InvalidQuantity(line.product_id));
            }
            if line.unit_price.is_sign_negative() {
                return Err(PricingError::InvalidPrice(line.product_id));
            }
            raw_subtotal += line.line_total();
            item_count = item_count.saturating_add(line.quantity);
        }
        let subtotal = round_money(raw_subtotal);

        let (discount_kind, percent) = match customer {
            CustomerKind::Member => (DiscountKind::Member, self.member_discount_percent),
            CustomerKind::Guest => match promo_code.map(str::trim).filter(|c| !c.is_empty()) {
                None => (DiscountKind::None, Decimal::ZERO),
                Some(code) if code.eq_ignore_ascii_case(WELCOME_PROMO_CODE) => {
                    (DiscountKind::Promo, self.welcome_promo_percent)
                }
                Some(code) => return Err(PricingError::UnknownPromoCode(code.to_owned())),
            },
        };
        let discount = round_money(subtotal * percent / Decimal::ONE_HUNDRED);

        let free_delivery =
            customer == CustomerKind::Member && subtotal >= self.free_delivery_threshold;
        let delivery_fee = if free_delivery {
            Decimal::ZERO
        } else {
            round_money(self.delivery_fee)
        };

        Ok(Quote {
            subtotal,
            delivery_fee,
            discount,
            total: subtotal + delivery_fee - discount,
            item_count,
            free_delivery,
            discount_kind,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, cents: i64, quantity: u32) -> PricingLine {
        PricingLine {
            product_id: ProductId::new(id),
            unit_price: Decimal::new(cents, 2),
            quantity,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_guest_pays_flat_delivery_without_discount() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 399, 2), line(2, 249, 1)], CustomerKind::Guest, None)
            .unwrap();

        assert_eq!(quote.subtotal, dec("10.47"));
        assert_eq!(quote.delivery_fee, dec("5.99"));
        assert_eq!(quote.discount, Decimal::ZERO);
        assert_eq!(quote.total, dec("16.46"));
        assert_eq!(quote.item_count, 3);
        assert_eq!(quote.discount_kind, DiscountKind::None);
    }

    #[test]
    fn test_member_below_threshold_gets_discount_but_pays_delivery() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 1_000, 2)], CustomerKind::Member, None)
            .unwrap();

        assert_eq!(quote.subtotal, dec("20.00"));
        assert_eq!(quote.discount, dec("1.00"));
        assert_eq!(quote.delivery_fee, dec("5.99"));
        assert!(!quote.free_delivery);
        assert_eq!(quote.total, dec("24.99"));
    }

    #[test]
    fn test_member_at_threshold_gets_free_delivery() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 3_000, 2)], CustomerKind::Member, None)
            .unwrap();

        assert_eq!(quote.subtotal, dec("60.00"));
        assert!(quote.free_delivery);
        assert_eq!(quote.delivery_fee, Decimal::ZERO);
        assert_eq!(quote.discount, dec("3.00"));
        assert_eq!(quote.total, dec("57.00"));
    }

    #[test]
    fn test_guest_above_threshold_still_pays_delivery() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 10_000, 1)], CustomerKind::Guest, None)
            .unwrap();

        assert!(!quote.free_delivery);
        assert_eq!(quote.delivery_fee, dec("5.99"));
    }

    #[test]
    fn test_total_is_sum_of_rounded_parts() {
        // 5% of 6.99 * 3 = 1.0485 -> 1.05
        let quote = PricingPolicy::default()
            .quote(&[line(4, 699, 3)], CustomerKind::Member, None)
            .unwrap();

        assert_eq!(quote.discount, dec("1.05"));
        assert_eq!(
            quote.total,
            quote.subtotal + quote.delivery_fee - quote.discount
        );
        assert_eq!(quote.total, dec("25.91"));
    }

    #[test]
    fn test_guest_welcome_code_case_insensitive() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 2_000, 1)], CustomerKind::Guest, Some(" welcome10 "))
            .unwrap();

        assert_eq!(quote.discount_kind, DiscountKind::Promo);
        assert_eq!(quote.discount, dec("2.00"));
        assert_eq!(quote.total, dec("23.99"));
    }

    #[test]
    fn test_guest_unknown_code_rejected() {
        let err = PricingPolicy::default()
            .quote(&[line(1, 2_000, 1)], CustomerKind::Guest, Some("FREEBIE"))
            .unwrap_err();
        assert_eq!(err, PricingError::UnknownPromoCode("FREEBIE".to_owned()));
    }

    #[test]
    fn test_blank_code_is_ignored() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 2_000, 1)], CustomerKind::Guest, Some("  "))
            .unwrap();
        assert_eq!(quote.discount_kind, DiscountKind::None);
    }

    #[test]
    fn test_member_ignores_promo_code() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 2_000, 1)], CustomerKind::Member, Some("WELCOME10"))
            .unwrap();
        assert_eq!(quote.discount_kind, DiscountKind::Member);
        assert_eq!(quote.discount, dec("1.00"));
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert_eq!(
            PricingPolicy::default().quote(&[], CustomerKind::Member, None),
            Err(PricingError::EmptyCart)
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert_eq!(
            PricingPolicy::default().quote(&[line(8, 100, 0)], CustomerKind::Guest, None),
            Err(PricingError::InvalidQuantity(ProductId::new(8)))
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            delivery_fee: dec("3.99"),
            free_delivery_threshold: dec("30"),
            member_discount_percent: Decimal::ZERO,
            ..PricingPolicy::default()
        };
        let quote = policy
            .quote(&[line(1, 1_500, 2)], CustomerKind::Member, None)
            .unwrap();
        assert!(quote.free_delivery);
        assert_eq!(quote.total, dec("30.00"));
    }

    #[test]
    fn test_quote_serializes_amounts_as_strings() {
        let quote = PricingPolicy::default()
            .quote(&[line(1, 399, 1)], CustomerKind::Guest, None)
            .unwrap();
        let json = serde_json::to_value(quote).unwrap();
        assert_eq!(json["subtotal"], "3.99");
        assert_eq!(json["deliveryFee"], "5.99");
        assert_eq!(json["discountKind"], "none");
    }
}
