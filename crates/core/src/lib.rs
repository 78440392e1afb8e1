//! FreshMarket Core - Shared types library.
//!
//! This crate provides common types used across all FreshMarket components:
//! - `storefront` - JSON API for the catalog, carts, checkout, and orders
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Cart arithmetic and order pricing live here so they can be
//! tested without a running database.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`pricing`] - Subtotal, delivery fee, and discount rules
//! - [`guest_cart`] - Session-held cart for customers who are not signed in

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod guest_cart;
pub mod pricing;
pub mod types;

pub use guest_cart::{GuestCart, GuestCartError, GuestCartLine, MAX_LINE_QUANTITY, ProductSnapshot};
pub use pricing::{CustomerKind, DiscountKind, PricingError, PricingLine, PricingPolicy, Quote};
pub use types::*;
