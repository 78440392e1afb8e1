//! Guest cart handlers.
//!
//! The cart is a [`GuestCart`] value stored in the visitor's session under
//! [`keys::GUEST_CART`]. Nothing here touches `cart_items`, and signing in
//! leaves it as it is.
//!
//! Checkout prices the cart with guest rules and returns a receipt. No order
//! rows are written for guests.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use freshmarket_core::{
    CustomerKind, GuestCart, GuestCartError, GuestCartLine, PaymentMethod, PricingError,
    ProductId, Quote,
};

use crate::db::ProductRepository;
use crate::error::{ApiJson, AppError, FieldError, Result, add_breadcrumb};
use crate::models::session::keys;
use crate::routes::{MessageResponse, default_quantity, parse_quantity};
use crate::state::AppState;

/// Guest cart contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCartResponse {
    pub items: Vec<GuestCartLine>,
    pub total_quantity: u32,
}

impl From<&GuestCart> for GuestCartResponse {
    fn from(cart: &GuestCart) -> Self {
        Self {
            items: cart.lines().to_vec(),
            total_quantity: cart.total_quantity(),
        }
    }
}

/// Item count badge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub total_quantity: u32,
}

/// Body for adding a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Body for changing a line's quantity. Zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub quantity: i64,
}

/// Body for pricing the cart.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Guest checkout body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Priced receipt for a guest checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestReceipt {
    pub reference: Uuid,
    pub items: Vec<GuestCartLine>,
    pub summary: Quote,
    pub payment_method: PaymentMethod,
    pub delivery_address: Option<String>,
    pub placed_at: DateTime<Utc>,
}

async fn load(session: &Session) -> Result<GuestCart> {
    Ok(session
        .get::<GuestCart>(keys::GUEST_CART)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, cart: &GuestCart) -> Result<()> {
    session.insert(keys::GUEST_CART, cart).await?;
    Ok(())
}

fn line_not_found() -> AppError {
    AppError::NotFound("Cart item not found".to_string())
}

/// Price a guest cart, reporting a bad promo code against its field.
fn quote_cart(
    state: &AppState,
    cart: &GuestCart,
    promo_code: Option<&str>,
) -> Result<Quote> {
    state
        .pricing()
        .quote(&cart.pricing_lines(), CustomerKind::Guest, promo_code)
        .map_err(|e| match e {
            PricingError::UnknownPromoCode(_) => AppError::Validation(vec![FieldError::new(
                "promoCode",
                "Invalid promo code",
            )]),
            other => other.into(),
        })
}

/// Show the guest cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<ApiJson<GuestCartResponse>> {
    let cart = load(&session).await?;
    Ok(ApiJson(GuestCartResponse::from(&cart)))
}

/// Total quantity in the guest cart.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<ApiJson<CountResponse>> {
    let cart = load(&session).await?;
    Ok(ApiJson(CountResponse {
        total_quantity: cart.total_quantity(),
    }))
}

/// Add a product, looking up its current details for the line snapshot.
#[instrument(skip(state, session, body), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<AddRequest>,
) -> Result<(StatusCode, ApiJson<GuestCartResponse>)> {
    let quantity = parse_quantity(body.quantity)?;

    let product = ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let mut cart = load(&session).await?;
    cart.add(product.snapshot(), quantity).map_err(|e| {
        let field = match e {
            GuestCartError::InvalidQuantity => {
                FieldError::new("quantity", "Quantity must be at least 1")
            }
            GuestCartError::QuantityTooLarge => FieldError::quantity_too_large(),
        };
        AppError::Validation(vec![field])
    })?;
    save(&session, &cart).await?;

    let product_id = body.product_id.to_string();
    add_breadcrumb("guest_cart", "Added to cart", Some(&[("product_id", &product_id)]));

    Ok((StatusCode::CREATED, ApiJson(GuestCartResponse::from(&cart))))
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(session, body))]
pub async fn update(
    session: Session,
    Path(line_id): Path<String>,
    ApiJson(body): ApiJson<UpdateRequest>,
) -> Result<ApiJson<GuestCartResponse>> {
    let quantity = if body.quantity <= 0 {
        0
    } else {
        parse_quantity(body.quantity)?
    };

    let mut cart = load(&session).await?;
    if !cart.update(&line_id, quantity) {
        return Err(line_not_found());
    }
    save(&session, &cart).await?;

    Ok(ApiJson(GuestCartResponse::from(&cart)))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Path(line_id): Path<String>,
) -> Result<ApiJson<GuestCartResponse>> {
    let mut cart = load(&session).await?;
    if !cart.remove(&line_id) {
        return Err(line_not_found());
    }
    save(&session, &cart).await?;

    Ok(ApiJson(GuestCartResponse::from(&cart)))
}

/// Empty the guest cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<ApiJson<MessageResponse>> {
    session.remove::<GuestCart>(keys::GUEST_CART).await?;
    Ok(ApiJson(MessageResponse {
        message: "Cart cleared",
    }))
}

/// Price the guest cart, with an optional promo code.
#[instrument(skip(state, session, body))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<QuoteRequest>,
) -> Result<ApiJson<Quote>> {
    let cart = load(&session).await?;
    let quote = quote_cart(&state, &cart, body.promo_code.as_deref())?;
    Ok(ApiJson(quote))
}

/// Check out the guest cart: price it, return a receipt, and empty the cart.
#[instrument(skip(state, session, body))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, ApiJson<GuestReceipt>)> {
    let cart = load(&session).await?;
    let summary = quote_cart(&state, &cart, body.promo_code.as_deref())?;

    let receipt = GuestReceipt {
        reference: Uuid::new_v4(),
        items: cart.lines().to_vec(),
        summary,
        payment_method: body.payment_method,
        delivery_address: body
            .delivery_address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()),
        placed_at: Utc::now(),
    };
    session.remove::<GuestCart>(keys::GUEST_CART).await?;

    tracing::info!(
        reference = %receipt.reference,
        total = %receipt.summary.total,
        "Guest checkout completed"
    );

    Ok((StatusCode::CREATED, ApiJson(receipt)))
}
