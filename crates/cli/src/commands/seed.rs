//! Sample catalog seeding.
//!
//! Inserts the two sample categories and eight products when the catalog is
//! empty. Running it again is a no-op.

use tracing::info;

use freshmarket_storefront::db::{self, seed::SeedOutcome};

use super::{CommandError, database_url};

/// Seed the sample catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any insert fails.
pub async fn sample_catalog() -> Result<(), CommandError> {
    let url = database_url()?;
    let pool = db::create_pool(&url).await?;
    info!("Connected to database");

    match db::seed::seed_sample_catalog(&pool).await? {
        SeedOutcome::Seeded {
            categories,
            products,
        } => {
            info!("Seeding complete!");
            info!("  Categories inserted: {categories}");
            info!("  Products inserted: {products}");
        }
        SeedOutcome::AlreadyPresent => {
            info!("Catalog already has categories, nothing to do");
        }
    }

    Ok(())
}
