use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItemDto>,
    /// Sum of current product price x quantity over the whole cart,
    /// not just the returned page.
    pub total_amount: i64,
}

/// Bare payload for the cart badge endpoint; intentionally not wrapped
/// in the usual response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartCount {
    pub count: i64,
}
