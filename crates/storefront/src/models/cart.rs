//! Authenticated cart types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use freshmarket_core::{CartItemId, PricingLine, UserId};

use super::catalog::Product;

/// One row of a signed-in customer's cart, with the product it refers to.
///
/// There is at most one line per (user, product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartItemId,
    pub user_id: UserId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product: Product,
}

impl CartLine {
    /// Price this line at the product's current price.
    #[must_use]
    pub const fn pricing_line(&self) -> PricingLine {
        PricingLine {
            product_id: self.product.id,
            unit_price: self.product.price,
            quantity: self.quantity,
        }
    }
}
