#![allow(dead_code)]

use anyhow::Result;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use storefront_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{categories::ActiveModel as CategoryActive, products::ActiveModel as ProductActive},
    state::AppState,
};

/// Connect to the test database, or skip the test when none is configured.
pub async fn setup_state() -> Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    Ok(Some(AppState { pool, orm }))
}

/// Test rows carry unique names so parallel test binaries sharing one
/// database never trip over each other.
pub fn unique(tag: &str) -> String {
    format!("{tag}-{}", Uuid::new_v4())
}

pub async fn create_user(state: &AppState, tag: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(format!("{tag}-{id}"))
        .bind(format!("{tag}-{id}@example.com"))
        .bind("dummy")
        .execute(&state.pool)
        .await?;
    Ok(id)
}

pub async fn create_category(state: &AppState, name: &str) -> Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

pub async fn create_product(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: i64,
    stock: i32,
) -> Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(Some("A product for testing".into())),
        price: Set(price),
        image: Set("/static/images/placeholder.jpg".into()),
        category_id: Set(category_id),
        stock: Set(stock),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}
