//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/categories              - List categories
//! POST   /api/categories              - Create category
//! GET    /api/products[?category=id]  - List products, optionally by category
//! GET    /api/products/{id}           - Product detail
//!
//! # Cart (requires auth)
//! GET    /api/cart                    - Lines and price summary
//! POST   /api/cart                    - Add product (sums with existing line)
//! DELETE /api/cart                    - Clear cart
//! PUT    /api/cart/{id}               - Set line quantity
//! DELETE /api/cart/{id}               - Remove line
//!
//! # Orders (requires auth)
//! GET    /api/orders                  - Order history, newest first
//! POST   /api/orders                  - Place order from cart
//! GET    /api/orders/{id}             - Order detail
//!
//! # Guest cart (session)
//! GET    /api/guest-cart              - Lines and total quantity
//! POST   /api/guest-cart              - Add product
//! DELETE /api/guest-cart              - Clear
//! GET    /api/guest-cart/count        - Total quantity
//! POST   /api/guest-cart/quote        - Price summary, optional promo code
//! POST   /api/guest-cart/checkout     - Priced receipt, clears the cart
//! PUT    /api/guest-cart/{line_id}    - Set quantity (0 removes)
//! DELETE /api/guest-cart/{line_id}    - Remove line
//!
//! # Auth
//! POST   /api/auth/register           - Create account and log in
//! POST   /api/auth/login              - Log in
//! POST   /api/auth/logout             - Log out
//! GET    /api/auth/user               - Current user (requires auth)
//!
//! # Misc
//! POST   /api/contact                 - Contact form
//! POST   /api/init-data               - Seed sample catalog when empty
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod contact;
pub mod guest_cart;
pub mod init_data;
pub mod orders;
pub mod products;

use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use freshmarket_core::MAX_LINE_QUANTITY;

use crate::error::{AppError, FieldError, Result};
use crate::middleware::{api_rate_limiter, strict_rate_limiter};
use crate::state::AppState;

/// Plain `{"message": ...}` response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Parse an ID taken from the request path.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} ID")))
}

/// Validate a requested quantity: between one and the per-line limit.
pub(crate) fn parse_quantity(quantity: i64) -> Result<u32> {
    if quantity < 1 {
        return Err(AppError::Validation(vec![FieldError::new(
            "quantity",
            "Quantity must be at least 1",
        )]));
    }
    u32::try_from(quantity)
        .ok()
        .filter(|&q| q <= MAX_LINE_QUANTITY)
        .ok_or_else(|| AppError::Validation(vec![FieldError::quantity_too_large()]))
}

const fn default_quantity() -> i64 {
    1
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Routes with a strict per-IP limit (credential and contact submissions).
fn strict_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/contact", post(contact::submit))
        .layer(strict_rate_limiter())
}

/// Everything else under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/products", get(products::list))
        .route("/products/{id}", get(products::show))
        .route("/cart", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/cart/{id}", put(cart::update).delete(cart::remove))
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/{id}", get(orders::show))
        .route(
            "/guest-cart",
            get(guest_cart::show)
                .post(guest_cart::add)
                .delete(guest_cart::clear),
        )
        .route("/guest-cart/count", get(guest_cart::count))
        .route("/guest-cart/quote", post(guest_cart::quote))
        .route("/guest-cart/checkout", post(guest_cart::checkout))
        .route(
            "/guest-cart/{line_id}",
            put(guest_cart::update).delete(guest_cart::remove),
        )
        .route("/auth/logout", post(auth::logout))
        .route("/auth/user", get(auth::user))
        .route("/init-data", post(init_data::init_data))
        .layer(api_rate_limiter())
}

/// Create all API routes for the storefront.
///
/// The session layer is not included; the caller adds it so tests can use
/// an in-memory store.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        strict_routes().merge(api_routes()).fallback(not_found),
    )
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use freshmarket_core::ProductId;

    use test_support::{app, send};

    #[test]
    fn test_parse_id() {
        let id: ProductId = parse_id("12", "product").unwrap();
        assert_eq!(id, ProductId::new(12));

        let err = parse_id::<ProductId>("apple", "product").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid product ID"));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(3).unwrap(), 3);
        assert!(matches!(parse_quantity(0), Err(AppError::Validation(_))));
        assert!(matches!(parse_quantity(-4), Err(AppError::Validation(_))));
        assert_eq!(parse_quantity(999).unwrap(), 999);
        assert!(matches!(
            parse_quantity(1_000),
            Err(AppError::Validation(ref errors))
                if errors.first().map(|e| e.field.as_str()) == Some("quantity")
        ));
        assert!(matches!(
            parse_quantity(i64::from(i32::MAX)),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let app = app();
        let res = send(&app, "GET", "/api/nope", None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body["message"], "Not found");
    }

    #[tokio::test]
    async fn test_protected_endpoints_require_auth() {
        let app = app();
        for (method, uri) in [
            ("GET", "/api/cart"),
            ("DELETE", "/api/cart"),
            ("PUT", "/api/cart/1"),
            ("DELETE", "/api/cart/1"),
            ("GET", "/api/orders"),
            ("GET", "/api/orders/1"),
            ("GET", "/api/auth/user"),
        ] {
            let res = send(&app, method, uri, None).await;
            assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(res.body["message"], "Authentication required");
        }
    }

    #[tokio::test]
    async fn test_protected_posts_require_auth() {
        let app = app();
        let add = serde_json::json!({ "productId": 1, "quantity": 1 });
        let res = send(&app, "POST", "/api/cart", Some(add)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);

        let order = serde_json::json!({ "paymentMethod": "card", "deliveryAddress": "x" });
        let res = send(&app, "POST", "/api/orders", Some(order)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }
}
