use chrono::DateTime;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{AddToCartRequest, CartCount, CartItemDto, CartList, UpdateCartItemRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Product},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

#[derive(FromRow)]
struct CartWithProductRow {
    cart_id: Uuid,
    quantity: i32,
    product_id: Uuid,
    name: String,
    description: Option<String>,
    price: i64,
    image: String,
    category_id: Uuid,
    stock: i32,
    created_at: DateTime<chrono::Utc>,
}

pub async fn list_cart(
    pool: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CartList>> {
    let (page, limit, offset) = pagination.normalize();
    let rows = sqlx::query_as::<_, CartWithProductRow>(
        r#"
        SELECT ci.id AS cart_id, ci.quantity,
               p.id AS product_id, p.name, p.description, p.price, p.image,
               p.category_id, p.stock, p.created_at
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    // Carts are pre-purchase, so the total always reflects the current
    // product price, never a snapshot.
    let total_amount: (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(p.price * ci.quantity), 0)::BIGINT
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| CartItemDto {
            id: row.cart_id,
            product: Product {
                id: row.product_id,
                name: row.name,
                description: row.description,
                price: row.price,
                image: row.image,
                category_id: row.category_id,
                stock: row.stock,
                created_at: row.created_at,
            },
            quantity: row.quantity,
        })
        .collect();

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "OK",
        CartList {
            items,
            total_amount: total_amount.0,
        },
        Some(meta),
    ))
}

pub async fn add_to_cart(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let product_exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(pool)
        .await?;
    if product_exist.is_none() {
        return Err(AppError::NotFound);
    }

    // A single upsert keeps the (user_id, product_id) uniqueness intact even
    // under concurrent adds: the second insert folds into an increment.
    let cart_item: CartItem = sqlx::query_as(
        r#"
        INSERT INTO cart_items (id, user_id, product_id, quantity)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (user_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + 1
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.product_id)
    .fetch_one(pool)
    .await?;

    log_audit(
        pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": payload.product_id, "quantity": cart_item.quantity })),
    )
    .await;

    Ok(ApiResponse::success("Added to cart", cart_item, None))
}

pub async fn update_cart_item(
    pool: &DbPool,
    user: &AuthUser,
    cart_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let existing: Option<CartItem> = sqlx::query_as("SELECT * FROM cart_items WHERE id = $1")
        .bind(cart_id)
        .fetch_optional(pool)
        .await?;

    let existing = match existing {
        Some(item) => item,
        None => return Err(AppError::NotFound),
    };
    if existing.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    // A non-positive quantity means removal; a zero-quantity row is never
    // persisted.
    if payload.quantity <= 0 {
        sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(cart_id)
            .bind(user.user_id)
            .execute(pool)
            .await?;

        log_audit(
            pool,
            Some(user.user_id),
            "cart_remove",
            Some("cart_items"),
            Some(serde_json::json!({ "cart_id": cart_id })),
        )
        .await;

        return Ok(ApiResponse::message_only("Item removed from cart"));
    }

    let cart_item: CartItem = sqlx::query_as(
        r#"
        UPDATE cart_items
        SET quantity = $3
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(cart_id)
    .bind(user.user_id)
    .bind(payload.quantity)
    .fetch_one(pool)
    .await?;

    log_audit(
        pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_id": cart_id, "quantity": payload.quantity })),
    )
    .await;

    Ok(ApiResponse::success("Cart updated", cart_item, None))
}

// Removing a row that does not exist or belongs to someone else is a silent
// no-op rather than an error.
pub async fn remove_from_cart(
    pool: &DbPool,
    user: &AuthUser,
    cart_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(cart_id)
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        log_audit(
            pool,
            Some(user.user_id),
            "cart_remove",
            Some("cart_items"),
            Some(serde_json::json!({ "cart_id": cart_id })),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn cart_count(pool: &DbPool, user: &AuthUser) -> AppResult<CartCount> {
    // Distinct line items, not total units.
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    Ok(CartCount { count: total.0 })
}
