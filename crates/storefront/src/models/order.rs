//! Order domain types.
//!
//! An order and its items are a snapshot: amounts and unit prices are copied
//! when the order is placed and never follow later catalog price changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use freshmarket_core::{
    CustomerKind, OrderId, OrderItemId, OrderStatus, PaymentMethod, PricingError, PricingPolicy,
    ProductId, Quote, UserId,
};

use super::cart::CartLine;
use super::catalog::Product;

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price at the time the order was placed.
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// An order item together with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Product,
}

/// An order with all of its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderLine>,
}

/// A line to be written as an `order_items` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDraftLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Everything needed to insert an order, priced and ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub quote: Quote,
    pub lines: Vec<OrderDraftLine>,
}

impl OrderDraft {
    /// Price a member's cart and turn it into a draft order.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::EmptyCart`] if `cart` has no lines.
    pub fn from_cart(
        user_id: UserId,
        cart: &[CartLine],
        payment_method: PaymentMethod,
        delivery_address: String,
        policy: &PricingPolicy,
    ) -> Result<Self, PricingError> {
        let pricing: Vec<_> = cart.iter().map(CartLine::pricing_line).collect();
        let quote = policy.quote(&pricing, CustomerKind::Member, None)?;

        let lines = pricing
            .into_iter()
            .map(|line| OrderDraftLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        Ok(Self {
            user_id,
            payment_method,
            delivery_address,
            quote,
            lines,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::models::catalog::Category;
    use freshmarket_core::{CartItemId, CategoryId};

    fn cart_line(id: i32, cents: i64, quantity: u32) -> CartLine {
        let now = Utc::now();
        CartLine {
            id: CartItemId::new(id),
            user_id: UserId::new(7),
            quantity,
            created_at: now,
            updated_at: now,
            product: Product {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                description: None,
                price: Decimal::new(cents, 2),
                unit: "kg".to_string(),
                image_url: None,
                category_id: CategoryId::new(1),
                is_organic: true,
                in_stock: true,
                created_at: now,
                updated_at: now,
                category: Category {
                    id: CategoryId::new(1),
                    name: "Fruits".to_string(),
                    slug: "fruits".to_string(),
                    description: None,
                    created_at: now,
                },
            },
        }
    }

    #[test]
    fn test_from_cart_snapshots_prices_and_applies_member_rules() {
        let cart = [cart_line(1, 399, 2), cart_line(2, 549, 1)];
        let draft = OrderDraft::from_cart(
            UserId::new(7),
            &cart,
            PaymentMethod::Card,
            "1 Market Street".to_string(),
            &PricingPolicy::default(),
        )
        .unwrap();

        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].unit_price, Decimal::new(399, 2));
        assert_eq!(draft.lines[0].quantity, 2);
        assert_eq!(draft.quote.subtotal, Decimal::new(1_347, 2));
        // 5% member discount, delivery charged below the threshold
        assert_eq!(draft.quote.discount, Decimal::new(67, 2));
        assert_eq!(draft.quote.delivery_fee, Decimal::new(599, 2));
        assert_eq!(draft.quote.total, Decimal::new(1_879, 2));
    }

    #[test]
    fn test_from_cart_rejects_empty_cart() {
        let err = OrderDraft::from_cart(
            UserId::new(7),
            &[],
            PaymentMethod::Bizum,
            String::new(),
            &PricingPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err, PricingError::EmptyCart);
    }

    #[test]
    fn test_order_with_items_flattens_order_fields() {
        let now = Utc::now();
        let line = cart_line(3, 429, 1);
        let order = OrderWithItems {
            order: Order {
                id: OrderId::new(11),
                user_id: UserId::new(7),
                status: OrderStatus::Pending,
                subtotal: Decimal::new(429, 2),
                delivery_fee: Decimal::new(599, 2),
                discount: Decimal::new(21, 2),
                total: Decimal::new(1_007, 2),
                payment_method: PaymentMethod::Bizum,
                delivery_address: "1 Market Street".to_string(),
                created_at: now,
                updated_at: now,
            },
            order_items: vec![OrderLine {
                item: OrderItem {
                    id: OrderItemId::new(1),
                    order_id: OrderId::new(11),
                    product_id: ProductId::new(3),
                    quantity: 1,
                    price: Decimal::new(429, 2),
                    created_at: now,
                },
                product: line.product,
            }],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 11);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["paymentMethod"], "bizum");
        assert_eq!(json["orderItems"][0]["orderId"], 11);
        assert_eq!(json["orderItems"][0]["price"], "4.29");
        assert_eq!(json["orderItems"][0]["product"]["name"], "Product 3");
    }
}
