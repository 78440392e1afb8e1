//! Catalog domain types: categories and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use freshmarket_core::{CategoryId, ProductId, ProductSnapshot};

/// A product category (e.g. "Fruits").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product, always loaded together with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Current unit price. Orders copy this value when they are placed.
    pub price: Decimal,
    /// Selling unit, e.g. `kg` or `head`.
    pub unit: String,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    pub is_organic: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: Category,
}

impl Product {
    /// Capture the fields a guest cart line keeps.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            unit: self.unit.clone(),
            image_url: self.image_url.clone(),
            category_name: self.category.name.clone(),
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub unit: String,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    pub is_organic: bool,
    pub in_stock: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn apples() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(1),
            name: "Red Apples".to_string(),
            description: None,
            price: Decimal::new(399, 2),
            unit: "kg".to_string(),
            image_url: Some("https://images.example/apples.jpg".to_string()),
            category_id: CategoryId::new(1),
            is_organic: true,
            in_stock: true,
            created_at: now,
            updated_at: now,
            category: Category {
                id: CategoryId::new(1),
                name: "Fruits".to_string(),
                slug: "fruits".to_string(),
                description: None,
                created_at: now,
            },
        }
    }

    #[test]
    fn test_snapshot_copies_display_fields() {
        let snapshot = apples().snapshot();
        assert_eq!(snapshot.id, ProductId::new(1));
        assert_eq!(snapshot.price, Decimal::new(399, 2));
        assert_eq!(snapshot.category_name, "Fruits");
    }

    #[test]
    fn test_product_serializes_camel_case_with_category() {
        let json = serde_json::to_value(apples()).unwrap();
        assert_eq!(json["categoryId"], 1);
        assert_eq!(json["isOrganic"], true);
        assert_eq!(json["price"], "3.99");
        assert_eq!(json["category"]["slug"], "fruits");
    }
}
