//! Status and choice enums for orders and contact messages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created `pending`; later transitions happen outside this
/// service (fulfilment), which is why there are no transition helpers here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Wire name as used in JSON (`in-transit`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant mobile payment.
    #[default]
    Bizum,
    /// Credit or debit card.
    Card,
}

/// Topic picked on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSubject {
    Order,
    Delivery,
    Product,
    Complaint,
    Other,
}

impl ContactSubject {
    /// All accepted subjects, in form order.
    pub const ALL: [Self; 5] = [
        Self::Order,
        Self::Delivery,
        Self::Product,
        Self::Complaint,
        Self::Other,
    ];

    /// Stored and wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Delivery => "delivery",
            Self::Product => "product",
            Self::Complaint => "complaint",
            Self::Other => "other",
        }
    }

    /// Look up a subject by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name.trim())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InTransit).unwrap(),
            "\"in-transit\""
        );
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
    }

    #[test]
    fn test_payment_method_parse() {
        let method: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(method, PaymentMethod::Card);
        assert!(serde_json::from_str::<PaymentMethod>("\"cash\"").is_err());
    }

    #[test]
    fn test_contact_subject_lookup() {
        assert_eq!(ContactSubject::from_name("delivery"), Some(ContactSubject::Delivery));
        assert_eq!(ContactSubject::from_name(" other "), Some(ContactSubject::Other));
        assert_eq!(ContactSubject::from_name("refund"), None);
    }
}
