//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `freshmarket`
//!
//! ## Tables
//!
//! - `users` - Customer accounts (email + Argon2 password hash)
//! - `categories`, `products` - Catalog
//! - `cart_items` - Signed-in carts, one row per (user, product)
//! - `orders`, `order_items` - Placed orders with price snapshots
//! - `contact_messages` - Contact form submissions
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! Guest carts live in the session, not in `cart_items`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p freshmarket-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` and decoded into
//! internal row types, which are then validated into domain models.

pub mod cart;
pub mod categories;
pub mod contact;
pub mod orders;
pub mod products;
pub mod seed;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use freshmarket_core::MAX_LINE_QUANTITY;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use contact::ContactRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A cart line quantity outside `1..=MAX_LINE_QUANTITY`.
    #[error("quantity out of range")]
    QuantityOutOfRange,
}

impl RepositoryError {
    /// Map a unique violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_unique_violation(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }

    /// Map a foreign key violation to `NotFound` and an out-of-range
    /// quantity (check violation or integer overflow) to `QuantityOutOfRange`.
    pub(crate) fn from_cart_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_foreign_key_violation() {
                return Self::NotFound;
            }
            if db_err.is_check_violation() || db_err.code().as_deref() == Some("22003") {
                return Self::QuantityOutOfRange;
            }
        }
        Self::Database(err)
    }
}

/// Convert a stored quantity into the domain's unsigned quantity.
pub(crate) fn quantity_from_db(quantity: i32) -> Result<u32, RepositoryError> {
    u32::try_from(quantity)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative quantity: {quantity}")))
}

/// Convert a domain quantity into the `INTEGER` column type, rejecting
/// anything above [`MAX_LINE_QUANTITY`].
pub(crate) fn quantity_to_db(quantity: u32) -> Result<i32, RepositoryError> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(RepositoryError::QuantityOutOfRange);
    }
    i32::try_from(quantity).map_err(|_| RepositoryError::QuantityOutOfRange)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
