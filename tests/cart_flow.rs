mod common;

use storefront_api::{
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::Pagination,
    services::cart_service,
};
use uuid::Uuid;

// Flow: add twice -> one row with quantity 2; foreign user can neither
// update nor remove; quantity zero deletes the row.
#[tokio::test]
async fn add_update_and_remove_cart_items() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "cart-user").await?;
    let other_id = common::create_user(&state, "cart-other").await?;
    let category_id = common::create_category(&state, &common::unique("Gadgets")).await?;
    let product_id =
        common::create_product(&state, category_id, &common::unique("Test Widget"), 1000, 10)
            .await?;

    let user = AuthUser { user_id };
    let other = AuthUser { user_id: other_id };

    cart_service::add_to_cart(&state.pool, &user, AddToCartRequest { product_id }).await?;
    let resp =
        cart_service::add_to_cart(&state.pool, &user, AddToCartRequest { product_id }).await?;
    let item = resp.data.expect("cart item");
    assert_eq!(item.quantity, 2);

    let list = cart_service::list_cart(
        &state.pool,
        &user,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await?;
    let cart = list.data.expect("cart list");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_amount, 2000);

    // Cross-user mutation is rejected outright.
    let update = cart_service::update_cart_item(
        &state.pool,
        &other,
        item.id,
        UpdateCartItemRequest { quantity: 5 },
    )
    .await;
    assert!(matches!(update, Err(AppError::Forbidden)));

    // Removing someone else's row is a silent no-op: no error, row intact.
    cart_service::remove_from_cart(&state.pool, &other, item.id).await?;
    let count = cart_service::cart_count(&state.pool, &user).await?;
    assert_eq!(count.count, 1);

    // An explicit update sets the quantity exactly, no increment.
    let resp = cart_service::update_cart_item(
        &state.pool,
        &user,
        item.id,
        UpdateCartItemRequest { quantity: 7 },
    )
    .await?;
    assert_eq!(resp.data.expect("updated item").quantity, 7);

    let resp = cart_service::update_cart_item(
        &state.pool,
        &user,
        item.id,
        UpdateCartItemRequest { quantity: 0 },
    )
    .await?;
    assert!(resp.data.is_none(), "zero quantity should remove the row");

    let list = cart_service::list_cart(
        &state.pool,
        &user,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await?;
    assert!(list.data.expect("cart list").items.is_empty());

    let missing = cart_service::update_cart_item(
        &state.pool,
        &user,
        item.id,
        UpdateCartItemRequest { quantity: 1 },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn add_to_cart_requires_existing_product() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "cart-missing").await?;
    let user = AuthUser { user_id };

    let result = cart_service::add_to_cart(
        &state.pool,
        &user,
        AddToCartRequest {
            product_id: Uuid::new_v4(),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let count = cart_service::cart_count(&state.pool, &user).await?;
    assert_eq!(count.count, 0);

    Ok(())
}
