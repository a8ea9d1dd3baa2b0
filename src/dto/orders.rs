use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Order;

/// Checkout form fields. Both are optional on purpose: an absent field is
/// stored as NULL rather than rejected.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
