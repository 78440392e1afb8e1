//! Cart for customers who are not signed in.
//!
//! A guest cart is a plain value: the storefront keeps it in the visitor's
//! session and never writes it to the `cart_items` table. Lines carry a
//! snapshot of the product taken when it was added, so the cart can be shown
//! without a catalog lookup.
//!
//! Lines are keyed by product: adding a product already in the cart bumps
//! its quantity instead of creating a second line.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PricingLine;
use crate::types::ProductId;

/// Largest quantity a single cart line may hold, for guest and member carts.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Errors from guest cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuestCartError {
    /// Quantities added to a cart must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The line would hold more than [`MAX_LINE_QUANTITY`].
    #[error("quantity cannot exceed {MAX_LINE_QUANTITY}")]
    QuantityTooLarge,
}

/// Product details captured when a line is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub unit: String,
    pub image_url: Option<String>,
    pub category_name: String,
}

/// One line of a guest cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCartLine {
    /// Opaque line id, `guest_<product id>_<unix millis>`.
    pub id: String,
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: ProductSnapshot,
}

/// A guest's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestCart {
    lines: Vec<GuestCartLine>,
}

fn checked_line_quantity(current: u32, added: u32) -> Result<u32, GuestCartError> {
    current
        .checked_add(added)
        .filter(|&total| total <= MAX_LINE_QUANTITY)
        .ok_or(GuestCartError::QuantityTooLarge)
}

impl GuestCart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of a product, merging with an existing line for the
    /// same product. Returns the id of the line holding the product.
    ///
    /// # Errors
    ///
    /// Returns [`GuestCartError::InvalidQuantity`] if `quantity` is zero.
    /// Returns [`GuestCartError::QuantityTooLarge`] if the line would exceed
    /// [`MAX_LINE_QUANTITY`]; the cart is left unchanged.
    pub fn add(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<String, GuestCartError> {
        if quantity == 0 {
            return Err(GuestCartError::InvalidQuantity);
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = checked_line_quantity(line.quantity, quantity)?;
            return Ok(line.id.clone());
        }

        let quantity = checked_line_quantity(0, quantity)?;
        let id = format!("guest_{}_{}", product.id, Utc::now().timestamp_millis());
        self.lines.push(GuestCartLine {
            id: id.clone(),
            product_id: product.id,
            quantity,
            product,
        });
        Ok(id)
    }

    /// Set the quantity of a line. A quantity of zero removes the line.
    ///
    /// Returns `false` if no line has the given id.
    pub fn update(&mut self, line_id: &str, quantity: u32) -> bool {
        let Some(index) = self.lines.iter().position(|line| line.id == line_id) else {
            return false;
        };

        if quantity == 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        true
    }

    /// Remove a line. Returns `false` if no line has the given id.
    pub fn remove(&mut self, line_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != line_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// The cart lines, in the order products were first added.
    #[must_use]
    pub fn lines(&self) -> &[GuestCartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines in the shape the pricing rules take, using snapshot prices.
    #[must_use]
    pub fn pricing_lines(&self) -> Vec<PricingLine> {
        self.lines
            .iter()
            .map(|line| PricingLine {
                product_id: line.product_id,
                unit_price: line.product.price,
                quantity: line.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::pricing::{CustomerKind, PricingPolicy};

    fn snapshot(id: i32, name: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Decimal::new(cents, 2),
            unit: "kg".to_owned(),
            image_url: None,
            category_name: "Fruits".to_owned(),
        }
    }

    #[test]
    fn test_add_same_product_merges_lines() {
        let mut cart = GuestCart::new();
        cart.add(snapshot(1, "Red Apples", 399), 1).unwrap();
        cart.add(snapshot(1, "Red Apples", 399), 2).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_add_keeps_first_snapshot_and_id() {
        let mut cart = GuestCart::new();
        let first_id = cart.add(snapshot(1, "Red Apples", 399), 1).unwrap();
        let merged_id = cart.add(snapshot(1, "Red Apples", 450), 1).unwrap();

        assert_eq!(merged_id, first_id);
        assert_eq!(cart.lines()[0].id, first_id);
        assert_eq!(cart.lines()[0].product.price, Decimal::new(399, 2));
        assert!(first_id.starts_with("guest_1_"));
    }

    #[test]
    fn test_add_zero_rejected() {
        let mut cart = GuestCart::new();
        assert_eq!(
            cart.add(snapshot(1, "Red Apples", 399), 0).unwrap_err(),
            GuestCartError::InvalidQuantity
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_over_line_limit_rejected() {
        let mut cart = GuestCart::new();
        cart.add(snapshot(1, "Red Apples", 399), MAX_LINE_QUANTITY)
            .unwrap();

        assert_eq!(
            cart.add(snapshot(1, "Red Apples", 399), 1).unwrap_err(),
            GuestCartError::QuantityTooLarge
        );
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);

        assert_eq!(
            cart.add(snapshot(2, "Bananas", 249), MAX_LINE_QUANTITY + 1)
                .unwrap_err(),
            GuestCartError::QuantityTooLarge
        );
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_update_sets_quantity_and_zero_removes() {
        let mut cart = GuestCart::new();
        let apples = cart.add(snapshot(1, "Red Apples", 399), 1).unwrap();
        let pears = cart.add(snapshot(2, "Bananas", 249), 1).unwrap();

        assert!(cart.update(&apples, 5));
        assert_eq!(cart.total_quantity(), 6);

        assert!(cart.update(&pears, 0));
        assert_eq!(cart.lines().len(), 1);
        assert!(!cart.update("guest_missing", 2));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = GuestCart::new();
        let apples = cart.add(snapshot(1, "Red Apples", 399), 1).unwrap();
        cart.add(snapshot(2, "Bananas", 249), 4).unwrap();

        assert!(cart.remove(&apples));
        assert!(!cart.remove(&apples));
        assert_eq!(cart.total_quantity(), 4);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_pricing_lines_feed_quote() {
        let mut cart = GuestCart::new();
        cart.add(snapshot(1, "Red Apples", 399), 2).unwrap();
        cart.add(snapshot(5, "Tomatoes", 549), 1).unwrap();

        let quote = PricingPolicy::default()
            .quote(&cart.pricing_lines(), CustomerKind::Guest, None)
            .unwrap();
        assert_eq!(quote.subtotal, Decimal::new(1_347, 2));
        assert_eq!(quote.item_count, 3);
    }

    #[test]
    fn test_serializes_as_line_array() {
        let mut cart = GuestCart::new();
        cart.add(snapshot(3, "Oranges", 429), 1).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["productId"], 3);
        assert_eq!(json[0]["product"]["price"], "4.29");

        let back: GuestCart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
