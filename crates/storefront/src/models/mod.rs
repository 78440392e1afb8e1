//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`]. Types returned from the JSON API serialize in camelCase.

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod order;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use catalog::{Category, NewCategory, NewProduct, Product};
pub use contact::{ContactMessage, NewContactMessage};
pub use order::{Order, OrderDraft, OrderDraftLine, OrderItem, OrderLine, OrderWithItems};
pub use session::CurrentUser;
pub use user::User;
