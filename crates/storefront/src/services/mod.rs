//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and password login
//! - `orders` - Turning a signed-in customer's cart into an order

pub mod auth;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use orders::OrderService;
