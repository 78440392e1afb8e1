//! Signed-in customer cart handlers.
//!
//! Lines live in `cart_items`, one per (user, product). Every handler is
//! scoped to the session user; another user's line ids behave as missing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use freshmarket_core::{CartItemId, CustomerKind, PricingLine, ProductId, Quote};

use crate::db::{CartRepository, RepositoryError};
use crate::error::{ApiJson, AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::routes::{MessageResponse, default_quantity, parse_id, parse_quantity};
use crate::state::AppState;

/// Cart contents with a member price summary (absent when empty).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub summary: Option<Quote>,
}

/// Body for adding a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Body for changing a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Response after clearing the cart.
#[derive(Debug, Serialize)]
pub struct ClearCartResponse {
    pub message: &'static str,
    pub removed: u64,
}

fn line_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Cart item not found".to_string()),
        other => other.into(),
    }
}

/// Show the cart with its member quote.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiJson<CartResponse>> {
    let items = CartRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    let summary = if items.is_empty() {
        None
    } else {
        let lines: Vec<PricingLine> = items.iter().map(CartLine::pricing_line).collect();
        Some(state.pricing().quote(&lines, CustomerKind::Member, None)?)
    };

    Ok(ApiJson(CartResponse { items, summary }))
}

/// Add a product, summing with an existing line for it.
#[instrument(skip(state, user, body), fields(user_id = %user.id, product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<(StatusCode, ApiJson<CartLine>)> {
    let quantity = parse_quantity(body.quantity)?;

    let line = CartRepository::new(state.pool())
        .add(user.id, body.product_id, quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => other.into(),
        })?;

    let product_id = body.product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", &product_id)]));

    Ok((StatusCode::CREATED, ApiJson(line)))
}

/// Set the quantity of a line. Quantities below one are rejected; use
/// `DELETE` to remove a line.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> Result<ApiJson<CartLine>> {
    let item_id: CartItemId = parse_id(&id, "cart item")?;
    let quantity = parse_quantity(body.quantity)?;

    let line = CartRepository::new(state.pool())
        .update_quantity(user.id, item_id, quantity)
        .await
        .map_err(line_not_found)?;

    Ok(ApiJson(line))
}

/// Remove a line.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<ApiJson<MessageResponse>> {
    let item_id: CartItemId = parse_id(&id, "cart item")?;

    CartRepository::new(state.pool())
        .remove(user.id, item_id)
        .await
        .map_err(line_not_found)?;

    Ok(ApiJson(MessageResponse {
        message: "Item removed from cart",
    }))
}

/// Remove every line from the cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiJson<ClearCartResponse>> {
    let removed = CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(ApiJson(ClearCartResponse {
        message: "Cart cleared",
        removed,
    }))
}
