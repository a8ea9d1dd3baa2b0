use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use storefront_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_catalog(&pool).await?;
    let demo_id = ensure_user(&pool, "demo", "demo@example.com", "password123").await?;

    println!("Seed completed. Demo user ID: {demo_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch the id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_optional(pool)
    .await?;

    let category_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
                .bind(name)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    Ok(category_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // Prices are in minor currency units.
    let products: &[(&str, i64, &str, &str, i32)] = &[
        ("Samsung Galaxy M34", 1899900, "5G Smartphone with 6000mAh battery", "Electronics", 25),
        ("Mi Smart Band 6", 249900, "AMOLED Display Fitness Band", "Electronics", 30),
        ("Boat Airdopes 141", 129900, "Wireless Earbuds with 42H Playback", "Electronics", 40),
        ("Cotton Kurti", 89900, "Handblock Printed Cotton Kurti", "Fashion", 15),
        ("Men's Formal Shirt", 159900, "Slim Fit Cotton Formal Shirt", "Fashion", 20),
        ("Kitchen Set", 299900, "7 Pcs Non-Stick Cookware Set", "Home & Kitchen", 10),
        ("Silk Saree", 459900, "Banarasi Silk Saree with Blouse", "Fashion", 8),
        ("Pressure Cooker", 189900, "Stainless Steel Pressure Cooker 5L", "Home & Kitchen", 12),
        ("Indian Spices Kit", 69900, "Assorted Indian Masalas Pack", "Groceries", 50),
        ("Yoga Mat", 79900, "Anti-Skip Exercise Yoga Mat", "Sports", 25),
        ("Tea Gift Set", 59900, "Assam & Darjeeling Tea Pack", "Groceries", 35),
        ("Brass Diya Set", 49900, "Handcrafted Brass Diya for Pooja", "Home Decor", 20),
    ];

    for (name, price, desc, category, stock) in products {
        let category_id = ensure_category(pool, category).await?;

        // Product names carry no uniqueness constraint, so guard by hand.
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category_id, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category_id)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded categories and products");
    Ok(())
}
