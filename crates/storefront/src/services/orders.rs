//! Order placement.
//!
//! Placing an order reads the customer's cart, prices it with the member
//! rules, writes the order and its items, and empties the cart. All of it
//! happens on one transaction: a failure at any step leaves the cart and the
//! order tables untouched.

use sqlx::PgPool;

use freshmarket_core::{CartItemId, PaymentMethod, PricingError, PricingPolicy, UserId};

use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::order::{OrderDraft, OrderLine, OrderWithItems};

/// Errors from placing an order.
#[derive(Debug, thiserror::Error)]
pub enum PlaceOrderError {
    /// The cart could not be priced (usually because it is empty).
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A database step failed; the transaction was rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlaceOrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Checkout details supplied by the customer.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
}

/// Order placement service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    policy: &'a PricingPolicy,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, policy: &'a PricingPolicy) -> Self {
        Self { pool, policy }
    }

    /// Turn a user's cart into an order.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::Pricing(PricingError::EmptyCart)` if the cart
    /// is empty; nothing is written in that case.
    /// Returns `PlaceOrderError::Repository` if any database step fails.
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        checkout: Checkout,
    ) -> Result<OrderWithItems, PlaceOrderError> {
        let mut tx = self.pool.begin().await?;

        let cart = CartRepository::lock_lines(&mut *tx, user_id).await?;
        let draft = OrderDraft::from_cart(
            user_id,
            &cart,
            checkout.payment_method,
            checkout.delivery_address,
            self.policy,
        )?;

        let (order, items) = OrderRepository::insert_with(&mut *tx, &draft).await?;
        let ordered: Vec<CartItemId> = cart.iter().map(|line| line.id).collect();
        let cleared = CartRepository::remove_lines_with(&mut *tx, user_id, &ordered).await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            items = items.len(),
            cleared,
            "Order placed"
        );

        // Items were inserted in cart order
        let order_items = items
            .into_iter()
            .zip(cart)
            .map(|(item, line)| OrderLine {
                item,
                product: line.product,
            })
            .collect();

        Ok(OrderWithItems { order, order_items })
    }
}
