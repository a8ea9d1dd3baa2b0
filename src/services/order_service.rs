use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CheckoutRequest, OrderList},
    entity::{
        cart_items::{self, Column as CartCol, Entity as CartItems},
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::Column as ProductCol,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Convert every cart line of the caller into one order row and drain the
/// cart, as a single transaction. Either all orders exist and the cart is
/// empty, or nothing changed.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderList>> {
    let txn = state.orm.begin().await?;

    #[derive(Debug, FromQueryResult)]
    struct CartProductRow {
        product_id: Uuid,
        quantity: i32,
        price: i64,
    }

    let rows = CartItems::find()
        .select_only()
        .column_as(CartCol::ProductId, "product_id")
        .column_as(CartCol::Quantity, "quantity")
        .column_as(ProductCol::Price, "price")
        .join(JoinType::InnerJoin, cart_items::Relation::Products.def())
        .filter(CartCol::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .into_model::<CartProductRow>()
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let mut orders: Vec<Order> = Vec::with_capacity(rows.len());

    for row in &rows {
        // total_price is snapshotted here; later price changes must not
        // touch orders that already exist.
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            product_id: Set(row.product_id),
            quantity: Set(row.quantity),
            total_price: Set(row.price * row.quantity as i64),
            status: Set("confirmed".into()),
            shipping_address: Set(payload.address.clone()),
            payment_method: Set(payload.payment_method.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        orders.push(order_from_entity(order));
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_count": orders.len() })),
    )
    .await;

    Ok(ApiResponse::success(
        "Order placed",
        OrderList { items: orders },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "OK",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        quantity: model.quantity,
        total_price: model.total_price,
        status: model.status,
        shipping_address: model.shipping_address,
        payment_method: model.payment_method,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
