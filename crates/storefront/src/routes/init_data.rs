//! Sample catalog seeding endpoint.

use axum::extract::State;
use tracing::instrument;

use crate::db::seed::{SeedOutcome, seed_sample_catalog};
use crate::error::{ApiJson, Result};
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Insert the sample catalog when no categories exist. Safe to call twice.
#[instrument(skip(state))]
pub async fn init_data(State(state): State<AppState>) -> Result<ApiJson<MessageResponse>> {
    match seed_sample_catalog(state.pool()).await? {
        SeedOutcome::Seeded {
            categories,
            products,
        } => tracing::info!(categories, products, "Sample catalog seeded"),
        SeedOutcome::AlreadyPresent => tracing::debug!("Catalog present, skipping seed"),
    }

    Ok(ApiJson(MessageResponse {
        message: "Sample data initialized",
    }))
}
