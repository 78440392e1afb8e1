//! Cart repository for signed-in customers.
//!
//! `cart_items` holds one row per (user, product); adding a product that is
//! already in the cart adds to the existing row's quantity. Every mutation is
//! scoped to the owning user, so one customer can never touch another's rows.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use freshmarket_core::{CartItemId, ProductId, UserId};

use super::products::{PRODUCT_COLUMNS, ProductRow};
use super::{RepositoryError, quantity_from_db, quantity_to_db};
use crate::models::cart::CartLine;

/// Internal row type for a cart line joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    user_id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            quantity: quantity_from_db(row.quantity)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            product: row.product.into(),
        })
    }
}

fn cart_line_sql(filter: &str, suffix: &str) -> String {
    format!(
        "SELECT ci.id, ci.user_id, ci.quantity, ci.created_at, ci.updated_at, {PRODUCT_COLUMNS}
         FROM cart_items ci
         JOIN products p ON p.id = ci.product_id
         JOIN categories c ON c.id = p.category_id
         WHERE {filter}
         ORDER BY ci.created_at, ci.id
         {suffix}"
    )
}

async fn fetch_lines<'e>(
    executor: impl PgExecutor<'e>,
    user_id: UserId,
    lock: bool,
) -> Result<Vec<CartLine>, RepositoryError> {
    let sql = cart_line_sql("ci.user_id = $1", if lock { "FOR UPDATE OF ci" } else { "" });
    let rows = sqlx::query_as::<_, CartLineRow>(&sql)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(CartLine::try_from).collect()
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        fetch_lines(self.pool, user_id, false).await
    }

    /// Get one of a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let sql = cart_line_sql("ci.user_id = $1 AND ci.id = $2", "");
        let row = sqlx::query_as::<_, CartLineRow>(&sql)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(self.pool)
            .await?;

        row.map(CartLine::try_from).transpose()
    }

    /// Add a product to a user's cart, summing with any existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::QuantityOutOfRange` if the summed line would
    /// exceed `MAX_LINE_QUANTITY`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartLine, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT uq_cart_items_user_product
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          updated_at = NOW()
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity_to_db(quantity)?)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_cart_write)?;

        self.get(user_id, CartItemId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Set the quantity of one of a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no such line.
    /// Returns `RepositoryError::QuantityOutOfRange` if `quantity` exceeds
    /// `MAX_LINE_QUANTITY`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<CartLine, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            ",
        )
        .bind(quantity_to_db(quantity)?)
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from_cart_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(user_id, item_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Remove one of a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no such line.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove(&self, user_id: UserId, item_id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove every line from a user's cart. Returns the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Transactional helpers (used by order placement)
    // =========================================================================

    /// Load a user's cart lines and lock the rows until the transaction ends.
    pub(crate) async fn lock_lines(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        fetch_lines(conn, user_id, true).await
    }

    /// Delete the given lines from a user's cart on an existing transaction.
    ///
    /// Only the listed lines are removed; lines added after they were locked
    /// stay in the cart.
    pub(crate) async fn remove_lines_with(
        conn: &mut PgConnection,
        user_id: UserId,
        item_ids: &[CartItemId],
    ) -> Result<u64, RepositoryError> {
        let ids: Vec<i32> = item_ids.iter().map(|id| id.as_i32()).collect();
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND id = ANY($2)")
            .bind(user_id)
            .bind(ids)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
