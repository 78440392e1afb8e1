//! Product repository.
//!
//! Products are always returned with their category. Other repositories that
//! embed products (cart lines, order items) reuse [`PRODUCT_COLUMNS`] and
//! [`ProductRow`] so the join shape lives in one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use freshmarket_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::catalog::{Category, NewProduct, Product};

/// Select list for a product joined with its category.
///
/// Expects `products` aliased as `p` and `categories` as `c`.
pub(crate) const PRODUCT_COLUMNS: &str = r"
    p.id AS product_id,
    p.name AS product_name,
    p.description AS product_description,
    p.price AS product_price,
    p.unit AS product_unit,
    p.image_url AS product_image_url,
    p.is_organic AS product_is_organic,
    p.in_stock AS product_in_stock,
    p.created_at AS product_created_at,
    p.updated_at AS product_updated_at,
    c.id AS category_id,
    c.name AS category_name,
    c.slug AS category_slug,
    c.description AS category_description,
    c.created_at AS category_created_at
";

/// Internal row type for a product joined with its category.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    product_id: i32,
    product_name: String,
    product_description: Option<String>,
    product_price: Decimal,
    product_unit: String,
    product_image_url: Option<String>,
    product_is_organic: bool,
    product_in_stock: bool,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
    category_id: i32,
    category_name: String,
    category_slug: String,
    category_description: Option<String>,
    category_created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let category_id = CategoryId::new(row.category_id);
        Self {
            id: ProductId::new(row.product_id),
            name: row.product_name,
            description: row.product_description,
            price: row.product_price,
            unit: row.product_unit,
            image_url: row.product_image_url,
            category_id,
            is_organic: row.product_is_organic,
            in_stock: row.product_in_stock,
            created_at: row.product_created_at,
            updated_at: row.product_updated_at,
            category: Category {
                id: category_id,
                name: row.category_name,
                slug: row.category_slug,
                description: row.category_description,
                created_at: row.category_created_at,
            },
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             JOIN categories c ON c.id = p.category_id
             ORDER BY p.name"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List the products of one category, ordered by name.
    ///
    /// An unknown category yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             JOIN categories c ON c.id = p.category_id
             WHERE p.category_id = $1
             ORDER BY p.name"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO products
                (name, description, price, unit, image_url, category_id, is_organic, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.price)
        .bind(&input.unit)
        .bind(input.image_url.as_deref())
        .bind(input.category_id)
        .bind(input.is_organic)
        .bind(input.in_stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        self.get(ProductId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
