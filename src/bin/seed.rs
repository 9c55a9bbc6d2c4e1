use rust_decimal::Decimal;
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::sea_orm_active_enums::UserRole,
    services::auth_service::hash_password,
    slug::{category_slug_base, product_category_slug, product_slug},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin123", UserRole::Admin).await?;
    let customer_id =
        ensure_user(&pool, "customer", "customer@example.com", "customer123", UserRole::Customer)
            .await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Customer ID: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={})", role.as_str());
    Ok(row.0)
}

async fn find_id(pool: &sqlx::PgPool, sql: &str, key: &str) -> anyhow::Result<Option<Uuid>> {
    let row: Option<(Uuid,)> = sqlx::query_as(sql).bind(key).fetch_optional(pool).await?;
    Ok(row.map(|(id,)| id))
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();

    let category_slug = category_slug_base("Electronics");
    let category_id = match find_id(pool, "SELECT id FROM categories WHERE slug = $1", &category_slug).await? {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO categories (id, name, slug, image, color) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind("Electronics")
            .bind(&category_slug)
            .bind("/media/category/image/electronics.png")
            .bind("blue")
            .execute(pool)
            .await?;
            id
        }
    };

    let product_category_id =
        match find_id(pool, "SELECT id FROM product_categories WHERE name = $1", "Phones").await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                sqlx::query(
                    "INSERT INTO product_categories (id, name, slug, category_id) VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind("Phones")
                .bind(product_category_slug("Phones", &mut rng))
                .bind(category_id)
                .execute(pool)
                .await?;
                id
            }
        };

    let country_id = match find_id(pool, "SELECT id FROM countries WHERE name = $1", "USA").await? {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            sqlx::query("INSERT INTO countries (id, name, icon) VALUES ($1, $2, $3)")
                .bind(id)
                .bind("USA")
                .bind("/media/country/icons/usa.png")
                .execute(pool)
                .await?;
            id
        }
    };

    let products = vec![
        ("iPhone 15", "Apple smartphone", Decimal::new(99900, 2), "Apple", true, true),
        ("Pixel 8", "Google smartphone", Decimal::new(69900, 2), "Google", false, true),
        ("Galaxy S24", "Samsung smartphone", Decimal::new(79900, 2), "Samsung", true, false),
    ];

    for (title, description, price, company, verified, recommended) in products {
        if find_id(pool, "SELECT id FROM products WHERE title = $1", title).await?.is_some() {
            continue;
        }
        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, slug, description, main_image, price, country_id,
                product_category_id, quantity, delivery_time, company, brand,
                condition, verified, recommended
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(product_slug(title, &mut rng))
        .bind(description)
        .bind("/media/products/main_images/placeholder.png")
        .bind(price)
        .bind(country_id)
        .bind(product_category_id)
        .bind(25)
        .bind("3-5 days")
        .bind(company)
        .bind(company)
        .bind("new")
        .bind(verified)
        .bind(recommended)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO services (id, title, image, description)
        SELECT $1, $2, $3, $4
        WHERE NOT EXISTS (SELECT 1 FROM services WHERE title = $2)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("Free delivery")
    .bind("/media/services/images/delivery.png")
    .bind("Free delivery on orders over $50")
    .execute(pool)
    .await?;

    println!("Seeded catalog");
    Ok(())
}
