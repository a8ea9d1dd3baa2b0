mod common;

use storefront_api::{
    dto::{cart::AddToCartRequest, orders::CheckoutRequest},
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service, order_service},
};

fn order_query() -> OrderListQuery {
    OrderListQuery {
        page: None,
        per_page: None,
        status: None,
        sort_order: Some(SortOrder::Desc),
    }
}

// Flow: two cart lines become two order rows with snapshotted totals, and
// the cart is drained in the same transaction.
#[tokio::test]
async fn checkout_converts_cart_lines_into_orders() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "checkout-user").await?;
    let user = AuthUser { user_id };
    let category_id = common::create_category(&state, &common::unique("Essentials")).await?;
    let first =
        common::create_product(&state, category_id, &common::unique("Widget"), 1000, 10).await?;
    let second =
        common::create_product(&state, category_id, &common::unique("Gizmo"), 500, 10).await?;

    // quantity 2 of the first product, 1 of the second
    cart_service::add_to_cart(&state.pool, &user, AddToCartRequest { product_id: first }).await?;
    cart_service::add_to_cart(&state.pool, &user, AddToCartRequest { product_id: first }).await?;
    cart_service::add_to_cart(&state.pool, &user, AddToCartRequest { product_id: second }).await?;

    let resp = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            address: Some("12 Harbor Lane".into()),
            payment_method: Some("cod".into()),
        },
    )
    .await?;
    let orders = resp.data.expect("orders").items;
    assert_eq!(orders.len(), 2);

    let first_order = orders
        .iter()
        .find(|o| o.product_id == first)
        .expect("order for first product");
    assert_eq!(first_order.quantity, 2);
    assert_eq!(first_order.total_price, 2000);

    let second_order = orders
        .iter()
        .find(|o| o.product_id == second)
        .expect("order for second product");
    assert_eq!(second_order.quantity, 1);
    assert_eq!(second_order.total_price, 500);

    for order in &orders {
        assert_eq!(order.status, "confirmed");
        assert_eq!(order.shipping_address.as_deref(), Some("12 Harbor Lane"));
        assert_eq!(order.payment_method.as_deref(), Some("cod"));
    }

    // The cart must be empty once the orders exist.
    let count = cart_service::cart_count(&state.pool, &user).await?;
    assert_eq!(count.count, 0);

    // A later price change must not rewrite history.
    sqlx::query("UPDATE products SET price = $1 WHERE id = $2")
        .bind(9999_i64)
        .bind(first)
        .execute(&state.pool)
        .await?;

    let listed = order_service::list_orders(&state, &user, order_query()).await?;
    let listed = listed.data.expect("order list").items;
    let unchanged = listed
        .iter()
        .find(|o| o.product_id == first)
        .expect("order survives listing");
    assert_eq!(unchanged.total_price, 2000);

    // Orders are scoped to their owner.
    let stranger_id = common::create_user(&state, "checkout-stranger").await?;
    let stranger = AuthUser {
        user_id: stranger_id,
    };
    let foreign = order_service::get_order(&state, &stranger, first_order.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    let own = order_service::get_order(&state, &user, first_order.id).await?;
    assert_eq!(own.data.expect("own order").id, first_order.id);

    Ok(())
}

#[tokio::test]
async fn checkout_on_empty_cart_creates_nothing() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "checkout-empty").await?;
    let user = AuthUser { user_id };

    let result = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            address: Some("Nowhere".into()),
            payment_method: Some("cash".into()),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::EmptyCart)));

    let listed = order_service::list_orders(&state, &user, order_query()).await?;
    assert!(listed.data.expect("order list").items.is_empty());

    Ok(())
}

#[tokio::test]
async fn checkout_stores_missing_form_fields_as_null() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "checkout-null").await?;
    let user = AuthUser { user_id };
    let category_id = common::create_category(&state, &common::unique("Misc")).await?;
    let product_id =
        common::create_product(&state, category_id, &common::unique("Trinket"), 250, 5).await?;

    cart_service::add_to_cart(&state.pool, &user, AddToCartRequest { product_id }).await?;

    let resp = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            address: None,
            payment_method: None,
        },
    )
    .await?;
    let orders = resp.data.expect("orders").items;
    assert_eq!(orders.len(), 1);
    assert!(orders[0].shipping_address.is_none());
    assert!(orders[0].payment_method.is_none());

    Ok(())
}
