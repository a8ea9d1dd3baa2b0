use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartCount, CartItemDto, CartList, UpdateCartItemRequest},
        catalog::{CategoryList, ProductList},
        orders::{CheckoutRequest, OrderList},
    },
    models::{CartItem, Category, Order, Product, User},
    response::{ApiResponse, Meta},
    routes::{auth, cart, categories, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        products::list_products,
        products::get_product,
        categories::list_categories,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::cart_count,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            CartItem,
            Order,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartItemDto,
            CartList,
            CartCount,
            CheckoutRequest,
            OrderList,
            ProductList,
            CategoryList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CategoryList>,
            ApiResponse<CartList>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Catalog", description = "Product and category browsing"),
        (name = "Cart", description = "Per-user shopping cart"),
        (name = "Orders", description = "Checkout and order history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
