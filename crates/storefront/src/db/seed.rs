//! Sample catalog used by `POST /api/init-data` and `fm-cli seed`.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// A sample category and the products filed under it.
struct SampleCategory {
    name: &'static str,
    slug: &'static str,
    products: &'static [SampleProduct],
}

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    price_cents: i64,
    unit: &'static str,
    image_url: &'static str,
}

const SAMPLE_CATALOG: &[SampleCategory] = &[
    SampleCategory {
        name: "Fruits",
        slug: "fruits",
        products: &[
            SampleProduct {
                name: "Red Apples",
                description: "Sweet and crispy organic apples, perfect for snacking",
                price_cents: 399,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1568702846914-96b305d2aaeb?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
            SampleProduct {
                name: "Bananas",
                description: "Naturally sweet and potassium-rich bananas",
                price_cents: 249,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1571771894821-ce9b6c11b08e?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
            SampleProduct {
                name: "Oranges",
                description: "Juicy Valencia oranges packed with vitamin C",
                price_cents: 429,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1547514701-42782101795e?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
            SampleProduct {
                name: "Strawberries",
                description: "Sweet and aromatic strawberries, locally grown",
                price_cents: 699,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1464965911861-746a04b4bca6?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
        ],
    },
    SampleCategory {
        name: "Vegetables",
        slug: "vegetables",
        products: &[
            SampleProduct {
                name: "Tomatoes",
                description: "Vine-ripened tomatoes bursting with flavor",
                price_cents: 549,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1592924357228-91a4daadcfea?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
            SampleProduct {
                name: "Lettuce",
                description: "Crisp and fresh iceberg lettuce for salads",
                price_cents: 299,
                unit: "head",
                image_url: "https://images.unsplash.com/photo-1622206151226-18ca2c9ab4a1?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
            SampleProduct {
                name: "Carrots",
                description: "Sweet and crunchy carrots rich in beta-carotene",
                price_cents: 349,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1598170845058-32b9d6a5da37?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
            SampleProduct {
                name: "Broccoli",
                description: "Nutritious green broccoli packed with vitamins",
                price_cents: 499,
                unit: "kg",
                image_url: "https://images.unsplash.com/photo-1459411621453-7b03977f4bfc?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
            },
        ],
    },
];

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog was empty and has been filled.
    Seeded { categories: usize, products: usize },
    /// Categories already existed; nothing was written.
    AlreadyPresent,
}

/// Insert the sample catalog if no categories exist yet.
///
/// Runs in one transaction holding a lock on `categories`, so two concurrent
/// calls cannot both seed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails; nothing is
/// written in that case.
pub async fn seed_sample_catalog(pool: &PgPool) -> Result<SeedOutcome, RepositoryError> {
    let mut tx = pool.begin().await?;

    sqlx::query("LOCK TABLE categories IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories)")
        .fetch_one(&mut *tx)
        .await?;
    if exists {
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let mut products = 0;
    for category in SAMPLE_CATALOG {
        let category_id: i32 = sqlx::query_scalar(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id",
        )
        .bind(category.name)
        .bind(category.slug)
        .fetch_one(&mut *tx)
        .await?;

        for product in category.products {
            sqlx::query(
                r"
                INSERT INTO products
                    (name, description, price, unit, image_url, category_id, is_organic, in_stock)
                VALUES ($1, $2, $3, $4, $5, $6, TRUE, TRUE)
                ",
            )
            .bind(product.name)
            .bind(product.description)
            .bind(Decimal::new(product.price_cents, 2))
            .bind(product.unit)
            .bind(product.image_url)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
            products += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(
        categories = SAMPLE_CATALOG.len(),
        products,
        "Seeded sample catalog"
    );

    Ok(SeedOutcome::Seeded {
        categories: SAMPLE_CATALOG.len(),
        products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_shape() {
        let products: usize = SAMPLE_CATALOG.iter().map(|c| c.products.len()).sum();
        assert_eq!(SAMPLE_CATALOG.len(), 2);
        assert_eq!(products, 8);
        assert!(
            SAMPLE_CATALOG
                .iter()
                .flat_map(|c| c.products)
                .all(|p| p.price_cents > 0 && p.image_url.starts_with("https://"))
        );
    }

    #[test]
    fn test_lettuce_sold_per_head() {
        let lettuce = SAMPLE_CATALOG
            .iter()
            .flat_map(|c| c.products)
            .find(|p| p.name == "Lettuce");
        assert_eq!(lettuce.map(|p| p.unit), Some("head"));
    }
}
