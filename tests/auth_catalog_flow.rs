mod common;

use storefront_api::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    routes::params::ProductQuery,
    services::{auth_service, catalog_service},
};

fn product_query(q: Option<&str>, category_id: Option<uuid::Uuid>) -> ProductQuery {
    ProductQuery {
        page: None,
        per_page: Some(100),
        q: q.map(str::to_string),
        category_id,
        sort_by: None,
        sort_order: None,
    }
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let email = format!("{}@example.com", common::unique("dup"));

    auth_service::register_user(
        &state.pool,
        RegisterRequest {
            username: common::unique("dup-first"),
            email: email.clone(),
            password: "hunter2hunter2".into(),
        },
    )
    .await?;

    let second = auth_service::register_user(
        &state.pool,
        RegisterRequest {
            username: common::unique("dup-second"),
            email: email.clone(),
            password: "hunter2hunter2".into(),
        },
    )
    .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(total.0, 1, "conflict must not create a second row");

    Ok(())
}

#[tokio::test]
async fn login_verifies_credentials() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    // login signs a token, so the secret has to exist for this test
    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let email = format!("{}@example.com", common::unique("login"));
    auth_service::register_user(
        &state.pool,
        RegisterRequest {
            username: common::unique("login-user"),
            email: email.clone(),
            password: "correct horse".into(),
        },
    )
    .await?;

    let ok = auth_service::login_user(
        &state.pool,
        LoginRequest {
            email: email.clone(),
            password: "correct horse".into(),
        },
    )
    .await?;
    let token = ok.data.expect("login response").token;
    assert!(token.starts_with("Bearer "));

    let wrong = auth_service::login_user(
        &state.pool,
        LoginRequest {
            email: email.clone(),
            password: "wrong battery staple".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let unknown = auth_service::login_user(
        &state.pool,
        LoginRequest {
            email: format!("{}@example.com", common::unique("nobody")),
            password: "whatever".into(),
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

    Ok(())
}

#[tokio::test]
async fn product_search_matches_name_substring_case_insensitively() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let category_id = common::create_category(&state, &common::unique("Searchables")).await?;
    // The marker keeps this run's rows distinguishable from anything else
    // in a shared database; the mixed casing is what the search must bridge.
    let marker = common::unique("kit");
    let spice = common::create_product(
        &state,
        category_id,
        &format!("Spices {}", marker.to_uppercase()),
        700,
        50,
    )
    .await?;
    let board = common::create_product(
        &state,
        category_id,
        &format!("{marker} carving board"),
        800,
        20,
    )
    .await?;
    let mat =
        common::create_product(&state, category_id, &common::unique("Yoga Mat"), 800, 25).await?;

    let found = catalog_service::list_products(&state, product_query(Some(&marker), None)).await?;
    let found = found.data.expect("products").items;
    assert!(found.iter().any(|p| p.id == spice));
    assert!(found.iter().any(|p| p.id == board));
    assert!(found.iter().all(|p| p.id != mat));

    // An empty query is no filter at all.
    let all = catalog_service::list_products(
        &state,
        product_query(Some(""), Some(category_id)),
    )
    .await?;
    let all = all.data.expect("products").items;
    assert_eq!(all.len(), 3);

    // Category filter narrows to that category's products.
    let scoped =
        catalog_service::list_products(&state, product_query(None, Some(category_id))).await?;
    let scoped = scoped.data.expect("products").items;
    assert_eq!(scoped.len(), 3);
    assert!(scoped.iter().all(|p| p.category_id == category_id));

    Ok(())
}

#[tokio::test]
async fn categories_are_listed_for_navigation() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let name = common::unique("Navigation");
    let category_id = common::create_category(&state, &name).await?;

    let listed = catalog_service::list_categories(&state).await?;
    let listed = listed.data.expect("categories").items;
    assert!(listed.iter().any(|c| c.id == category_id && c.name == name));

    Ok(())
}
