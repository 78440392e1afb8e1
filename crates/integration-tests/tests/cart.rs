//! Authenticated cart storage tests.

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;

use freshmarket_core::{MAX_LINE_QUANTITY, ProductId};
use freshmarket_integration_tests::{
    count_rows, create_category, create_product, create_user,
};
use freshmarket_storefront::db::{CartRepository, RepositoryError};

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_adding_same_product_twice_sums_quantity(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await.unwrap();
    let fruits = create_category(&pool, "fruits").await.unwrap();
    let apples = create_product(&pool, fruits.id, "Red Apples", 399).await.unwrap();

    let cart = CartRepository::new(&pool);
    let first = cart.add(user.id, apples.id, 1).await.unwrap();
    let second = cart.add(user.id, apples.id, 2).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 3);
    assert_eq!(count_rows(&pool, "cart_items").await.unwrap(), 1);

    let lines = cart.list_for_user(user.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product.name, "Red Apples");
    assert_eq!(lines[0].product.category.slug, "fruits");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_summed_quantity_over_limit_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await.unwrap();
    let fruits = create_category(&pool, "fruits").await.unwrap();
    let apples = create_product(&pool, fruits.id, "Red Apples", 399).await.unwrap();

    let cart = CartRepository::new(&pool);
    let line = cart.add(user.id, apples.id, MAX_LINE_QUANTITY).await.unwrap();

    let err = cart.add(user.id, apples.id, 1).await.unwrap_err();
    assert!(matches!(err, RepositoryError::QuantityOutOfRange));

    let err = cart.add(user.id, apples.id, u32::MAX).await.unwrap_err();
    assert!(matches!(err, RepositoryError::QuantityOutOfRange));

    let err = cart
        .update_quantity(user.id, line.id, MAX_LINE_QUANTITY + 1)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::QuantityOutOfRange));

    let stored = cart.get(user.id, line.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, MAX_LINE_QUANTITY);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_summed_quantity_check_holds_in_the_database(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await.unwrap();
    let fruits = create_category(&pool, "fruits").await.unwrap();
    let apples = create_product(&pool, fruits.id, "Red Apples", 399).await.unwrap();

    let cart = CartRepository::new(&pool);
    cart.add(user.id, apples.id, 600).await.unwrap();

    // Each request is within the limit; only the sum is not
    let err = cart.add(user.id, apples.id, 600).await.unwrap_err();
    assert!(matches!(err, RepositoryError::QuantityOutOfRange));
    assert_eq!(
        cart.list_for_user(user.id).await.unwrap()[0].quantity,
        600
    );
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_add_unknown_product_is_not_found(pool: PgPool) {
    let user = create_user(&pool, "ana@example.com").await.unwrap();

    let err = CartRepository::new(&pool)
        .add(user.id, ProductId::new(9_999), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_clear_only_touches_one_user(pool: PgPool) {
    let ana = create_user(&pool, "ana@example.com").await.unwrap();
    let luis = create_user(&pool, "luis@example.com").await.unwrap();
    let veg = create_category(&pool, "vegetables").await.unwrap();
    let carrots = create_product(&pool, veg.id, "Carrots", 199).await.unwrap();
    let lettuce = create_product(&pool, veg.id, "Lettuce", 179).await.unwrap();

    let cart = CartRepository::new(&pool);
    cart.add(ana.id, carrots.id, 1).await.unwrap();
    cart.add(ana.id, lettuce.id, 2).await.unwrap();
    cart.add(luis.id, carrots.id, 4).await.unwrap();

    let removed = cart.clear(ana.id).await.unwrap();

    assert_eq!(removed, 2);
    assert!(cart.list_for_user(ana.id).await.unwrap().is_empty());
    let remaining = cart.list_for_user(luis.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].quantity, 4);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_lines_are_scoped_to_owner(pool: PgPool) {
    let ana = create_user(&pool, "ana@example.com").await.unwrap();
    let luis = create_user(&pool, "luis@example.com").await.unwrap();
    let fruits = create_category(&pool, "fruits").await.unwrap();
    let oranges = create_product(&pool, fruits.id, "Oranges", 429).await.unwrap();

    let cart = CartRepository::new(&pool);
    let line = cart.add(ana.id, oranges.id, 1).await.unwrap();

    let err = cart.update_quantity(luis.id, line.id, 5).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
    let err = cart.remove(luis.id, line.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let updated = cart.update_quantity(ana.id, line.id, 5).await.unwrap();
    assert_eq!(updated.quantity, 5);

    cart.remove(ana.id, line.id).await.unwrap();
    let err = cart.remove(ana.id, line.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}
