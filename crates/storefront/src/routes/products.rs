//! Product route handlers.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use freshmarket_core::{CategoryId, ProductId};

use crate::db::ProductRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::models::Product;
use crate::routes::parse_id;
use crate::state::AppState;

/// Query parameters for the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    /// A category id, or `all`.
    pub category: Option<String>,
}

impl ProductListQuery {
    /// The category to filter by. Anything that is not a category id
    /// (including `all`) means no filter.
    fn category_id(&self) -> Option<CategoryId> {
        self.category
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
    }
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<ApiJson<Vec<Product>>> {
    let repo = ProductRepository::new(state.pool());
    let products = match query.category_id() {
        Some(category_id) => repo.list_by_category(category_id).await?,
        None => repo.list().await?,
    };
    Ok(ApiJson(products))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiJson<Product>> {
    let id: ProductId = parse_id(&id, "product")?;
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(ApiJson)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
