//! Integration tests for cart line management.
//!
//! These tests require a running `PostgreSQL` database; see the crate docs
//! for setup. Run with: `cargo test -p stitchline-integration-tests -- --ignored`

use rust_decimal::Decimal;
use stitchline_core::VariantId;
use stitchline_integration_tests::{seed_user, seed_variant, test_pool};
use stitchline_server::db::{CartRepository, RepositoryError};
use stitchline_server::models::cart::AddToCartRequest;

fn add(variant_id: VariantId, quantity: i32) -> AddToCartRequest {
    AddToCartRequest {
        product_variant_id: variant_id,
        quantity,
    }
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_add_to_cart_increments_existing_line() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool).await;
    let variant_id = seed_variant(&pool, 10, Decimal::new(19_99, 2)).await;

    let repo = CartRepository::new(&pool);
    repo.add_item(user_id, &add(variant_id, 2))
        .await
        .expect("Failed to add line");
    let item = repo
        .add_item(user_id, &add(variant_id, 3))
        .await
        .expect("Failed to increment line");

    assert_eq!(item.quantity, 5);

    let cart = repo.get_or_create(user_id).await.expect("Failed to get cart");
    let items = repo.get_items(cart.id).await.expect("Failed to get items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item.quantity, 5);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_add_to_cart_rejects_combined_quantity_over_stock() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool).await;
    let variant_id = seed_variant(&pool, 4, Decimal::new(19_99, 2)).await;

    let repo = CartRepository::new(&pool);
    repo.add_item(user_id, &add(variant_id, 3))
        .await
        .expect("Failed to add line");

    let result = repo.add_item(user_id, &add(variant_id, 2)).await;
    assert!(matches!(
        result,
        Err(RepositoryError::OutOfStock {
            requested: 5,
            available: 4,
            ..
        })
    ));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_update_cart_item_to_zero_deletes_line() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool).await;
    let variant_id = seed_variant(&pool, 10, Decimal::new(19_99, 2)).await;

    let repo = CartRepository::new(&pool);
    let item = repo
        .add_item(user_id, &add(variant_id, 2))
        .await
        .expect("Failed to add line");

    let updated = repo
        .update_item(item.id, 0)
        .await
        .expect("Failed to update line");
    assert!(updated.is_none());

    let cart = repo.get_or_create(user_id).await.expect("Failed to get cart");
    let items = repo.get_items(cart.id).await.expect("Failed to get items");
    assert!(items.is_empty());
}
