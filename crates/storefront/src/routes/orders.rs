//! Order history and checkout for signed-in customers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use freshmarket_core::{OrderId, PaymentMethod};

use crate::db::OrderRepository;
use crate::error::{ApiJson, AppError, FieldError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::OrderWithItems;
use crate::routes::parse_id;
use crate::services::{OrderService, orders::Checkout};
use crate::state::AppState;

/// Checkout body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_address: String,
}

impl PlaceOrderRequest {
    fn into_checkout(self) -> Result<Checkout> {
        let delivery_address = self.delivery_address.trim().to_string();
        if delivery_address.is_empty() {
            return Err(AppError::Validation(vec![FieldError::new(
                "deliveryAddress",
                "Delivery address is required",
            )]));
        }
        Ok(Checkout {
            payment_method: self.payment_method,
            delivery_address,
        })
    }
}

/// List the customer's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiJson<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(ApiJson(orders))
}

/// Show one of the customer's orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<ApiJson<OrderWithItems>> {
    let order_id: OrderId = parse_id(&id, "order")?;
    OrderRepository::new(state.pool())
        .get_for_user(user.id, order_id)
        .await?
        .map(ApiJson)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Place an order from the customer's cart.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<PlaceOrderRequest>,
) -> Result<(StatusCode, ApiJson<OrderWithItems>)> {
    let checkout = body.into_checkout()?;

    let placed = OrderService::new(state.pool(), state.pricing())
        .place_order(user.id, checkout)
        .await?;

    let order_id = placed.order.id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", &order_id)]));

    Ok((StatusCode::CREATED, ApiJson(placed)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_requires_address() {
        let body: PlaceOrderRequest =
            serde_json::from_str(r#"{"paymentMethod": "card", "deliveryAddress": "   "}"#).unwrap();
        let err = body.into_checkout().unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref errors) if errors[0].field == "deliveryAddress")
        );
    }

    #[test]
    fn test_checkout_trims_address() {
        let body: PlaceOrderRequest = serde_json::from_str(
            r#"{"paymentMethod": "bizum", "deliveryAddress": " Calle Mayor 1, Madrid "}"#,
        )
        .unwrap();
        let checkout = body.into_checkout().unwrap();
        assert_eq!(checkout.payment_method, PaymentMethod::Bizum);
        assert_eq!(checkout.delivery_address, "Calle Mayor 1, Madrid");
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let body = serde_json::from_str::<PlaceOrderRequest>(
            r#"{"paymentMethod": "cash", "deliveryAddress": "x"}"#,
        );
        assert!(body.is_err());
    }
}
