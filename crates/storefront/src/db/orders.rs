//! Order repository.
//!
//! An order header and its items are always written together in one
//! transaction. Amounts are copied from the [`OrderDraft`], never recomputed
//! from current product prices.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use freshmarket_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::products::{PRODUCT_COLUMNS, ProductRow};
use super::{RepositoryError, quantity_from_db, quantity_to_db};
use crate::models::order::{Order, OrderDraft, OrderItem, OrderLine, OrderWithItems};

const ORDER_COLUMNS: &str = "id, user_id, status, subtotal, delivery_fee, discount, total, \
                             payment_method, delivery_address, created_at, updated_at";

/// Internal row type for order headers.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: OrderStatus,
    subtotal: Decimal,
    delivery_fee: Decimal,
    discount: Decimal,
    total: Decimal,
    payment_method: PaymentMethod,
    delivery_address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status: row.status,
            subtotal: row.subtotal,
            delivery_fee: row.delivery_fee,
            discount: row.discount,
            total: row.total,
            payment_method: row.payment_method,
            delivery_address: row.delivery_address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for an order item joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    order_id: i32,
    quantity: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        let product: crate::models::Product = row.product.into();
        Ok(Self {
            item: OrderItem {
                id: OrderItemId::new(row.id),
                order_id: OrderId::new(row.order_id),
                product_id: product.id,
                quantity: quantity_from_db(row.quantity)?,
                price: row.price,
                created_at: row.created_at,
            },
            product,
        })
    }
}

/// Internal row type for a bare order item.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: quantity_from_db(row.quantity)?,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and its items atomically.
    ///
    /// Either the order row and every item row are written, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a line references a product
    /// that does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let (order, _) = Self::insert_with(&mut *tx, draft).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// List a user's orders, newest first, each with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let orders: Vec<Order> = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Order::from)
            .collect();

        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let mut lines_by_order = self.lines_for_orders(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| OrderWithItems {
                order_items: lines_by_order.remove(&order.id).unwrap_or_default(),
                order,
            })
            .collect())
    }

    /// Get one of a user's orders with its items.
    ///
    /// Returns `None` if the order does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2");
        let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let order = Order::from(row);
        let mut lines = self.lines_for_orders(&[order.id.as_i32()]).await?;

        Ok(Some(OrderWithItems {
            order_items: lines.remove(&order.id).unwrap_or_default(),
            order,
        }))
    }

    async fn lines_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<OrderId, Vec<OrderLine>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT oi.id, oi.order_id, oi.quantity, oi.price, oi.created_at, {PRODUCT_COLUMNS}
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             JOIN categories c ON c.id = p.category_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id"
        );
        let rows = sqlx::query_as::<_, OrderLineRow>(&sql)
            .bind(order_ids)
            .fetch_all(self.pool)
            .await?;

        let mut grouped: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            let line = OrderLine::try_from(row)?;
            grouped.entry(line.item.order_id).or_default().push(line);
        }
        Ok(grouped)
    }

    /// Insert an order header and its items on an open transaction.
    ///
    /// The caller owns the transaction and decides whether to commit.
    pub(crate) async fn insert_with(
        conn: &mut PgConnection,
        draft: &OrderDraft,
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let sql = format!(
            "INSERT INTO orders
                 (user_id, status, subtotal, delivery_fee, discount, total,
                  payment_method, delivery_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ORDER_COLUMNS}"
        );
        let order: Order = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(draft.user_id)
            .bind(OrderStatus::Pending)
            .bind(draft.quote.subtotal)
            .bind(draft.quote.delivery_fee)
            .bind(draft.quote.discount)
            .bind(draft.quote.total)
            .bind(draft.payment_method)
            .bind(&draft.delivery_address)
            .fetch_one(&mut *conn)
            .await?
            .into();

        let mut items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                RETURNING id, order_id, product_id, quantity, price, created_at
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(quantity_to_db(line.quantity)?)
            .bind(line.unit_price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::NotFound;
                }
                RepositoryError::Database(e)
            })?;
            items.push(OrderItem::try_from(row)?);
        }

        tracing::debug!(
            order_id = %order.id,
            items = items.len(),
            total = %order.total,
            "Inserted order"
        );

        Ok((order, items))
    }
}
