//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use freshmarket_core::{Email, UserId};

/// A storefront customer account.
///
/// The password hash never leaves the repository layer, so this type is safe
/// to serialize straight into API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
