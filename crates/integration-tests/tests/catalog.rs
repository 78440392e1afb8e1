//! Catalog storage and seeding tests.

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;

use freshmarket_core::ProductId;
use freshmarket_integration_tests::{count_rows, create_category, create_product};
use freshmarket_storefront::db::seed::{SeedOutcome, seed_sample_catalog};
use freshmarket_storefront::db::{CategoryRepository, ProductRepository, RepositoryError};
use freshmarket_storefront::models::NewCategory;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_missing_product_is_none(pool: PgPool) {
    let product = ProductRepository::new(&pool)
        .get(ProductId::new(424_242))
        .await
        .unwrap();
    assert!(product.is_none());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_list_by_category(pool: PgPool) {
    let fruits = create_category(&pool, "fruits").await.unwrap();
    let veg = create_category(&pool, "vegetables").await.unwrap();
    create_product(&pool, fruits.id, "Bananas", 249).await.unwrap();
    create_product(&pool, veg.id, "Broccoli", 329).await.unwrap();
    create_product(&pool, veg.id, "Tomatoes", 549).await.unwrap();

    let repo = ProductRepository::new(&pool);
    assert_eq!(repo.list().await.unwrap().len(), 3);

    let vegetables = repo.list_by_category(veg.id).await.unwrap();
    assert_eq!(vegetables.len(), 2);
    assert!(vegetables.iter().all(|p| p.category.id == veg.id));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_category_slug_conflicts(pool: PgPool) {
    create_category(&pool, "fruits").await.unwrap();

    let err = CategoryRepository::new(&pool)
        .create(&NewCategory {
            name: "More Fruits".to_string(),
            slug: "fruits".to_string(),
            description: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_seed_runs_once(pool: PgPool) {
    let first = seed_sample_catalog(&pool).await.unwrap();
    assert_eq!(
        first,
        SeedOutcome::Seeded {
            categories: 2,
            products: 8
        }
    );

    let second = seed_sample_catalog(&pool).await.unwrap();
    assert_eq!(second, SeedOutcome::AlreadyPresent);

    assert_eq!(count_rows(&pool, "categories").await.unwrap(), 2);
    assert_eq!(count_rows(&pool, "products").await.unwrap(), 8);
}
