//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! fm-cli migrate
//! ```
//!
//! Applies `crates/storefront/migrations/` and creates the session table
//! used by tower-sessions.

use tower_sessions_sqlx_store::PostgresStore;

use freshmarket_storefront::db;

use super::{CommandError, database_url};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session store table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
