use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sqlx::postgres::PgPoolOptions;
use storefront_api::{
    dto::admin::{CreateCategoryRequest, CreateProductRequest, CreateServiceRequest, UpdateProductRequest},
    entity::sea_orm_active_enums::UserRole,
    error::AppError,
    middleware::auth::AuthUser,
    services::{admin_service, profile_service::ProfileContextBuilder},
    state::AppState,
    storage::LocalBlobStore,
};
use uuid::Uuid;

// Input checks run before any query, so a state without a live database is enough.
fn offline_state() -> anyhow::Result<AppState> {
    let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/storefront_offline")?;
    Ok(AppState {
        pool,
        orm: DatabaseConnection::Disconnected,
        jwt_secret: Arc::from("offline"),
        blobs: Arc::new(LocalBlobStore::new(std::env::temp_dir(), "/media")),
        profile: ProfileContextBuilder::new(None),
    })
}

fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: UserRole::Admin,
    }
}

fn product(title: &str) -> CreateProductRequest {
    CreateProductRequest {
        title: title.to_string(),
        description: "desc".into(),
        main_image: "x.png".into(),
        price: Decimal::new(100, 0),
        country_id: None,
        product_category_id: Uuid::new_v4(),
        quantity: None,
        review: None,
        year: None,
        delivery_time: "2 days".into(),
        star: None,
        company: String::new(),
        brand: String::new(),
        size: String::new(),
        discount: None,
        color: None,
        verified: false,
        recommended: false,
        condition: String::new(),
        is_active: None,
    }
}

fn assert_bad_request<T: std::fmt::Debug>(result: Result<T, AppError>, field: &str) {
    match result {
        Err(AppError::BadRequest(message)) => assert!(message.contains(field), "{message}"),
        other => panic!("expected bad request for {field}, got {other:?}"),
    }
}

#[tokio::test]
async fn category_name_longer_than_column_is_rejected() -> anyhow::Result<()> {
    let state = offline_state()?;
    let result = admin_service::create_category(
        &state,
        &admin(),
        CreateCategoryRequest {
            name: "a".repeat(101),
            image: "x.png".into(),
            description: None,
            color: None,
            is_active: None,
        },
    )
    .await;
    assert_bad_request(result, "name");
    Ok(())
}

#[tokio::test]
async fn product_text_fields_respect_column_widths() -> anyhow::Result<()> {
    let state = offline_state()?;

    assert_bad_request(
        admin_service::create_product(&state, &admin(), product(&"t".repeat(201))).await,
        "title",
    );

    let mut long_company = product("Phone");
    long_company.company = "c".repeat(201);
    assert_bad_request(
        admin_service::create_product(&state, &admin(), long_company).await,
        "company",
    );

    let mut long_condition = product("Phone");
    long_condition.condition = "é".repeat(101);
    assert_bad_request(
        admin_service::create_product(&state, &admin(), long_condition).await,
        "condition",
    );
    Ok(())
}

#[tokio::test]
async fn negative_year_is_rejected_on_create_and_update() -> anyhow::Result<()> {
    let state = offline_state()?;

    let mut old = product("Phone");
    old.year = Some(-1);
    assert_bad_request(admin_service::create_product(&state, &admin(), old).await, "year");

    let update = UpdateProductRequest {
        year: Some(-5),
        ..Default::default()
    };
    assert_bad_request(
        admin_service::update_product(&state, &admin(), Uuid::new_v4(), update).await,
        "year",
    );

    let update = UpdateProductRequest {
        size: Some("s".repeat(101)),
        ..Default::default()
    };
    assert_bad_request(
        admin_service::update_product(&state, &admin(), Uuid::new_v4(), update).await,
        "size",
    );
    Ok(())
}

#[tokio::test]
async fn service_description_is_capped() -> anyhow::Result<()> {
    let state = offline_state()?;
    let result = admin_service::create_service(
        &state,
        &admin(),
        CreateServiceRequest {
            title: "Delivery".into(),
            image: "x.png".into(),
            description: "d".repeat(501),
            is_active: None,
        },
    )
    .await;
    assert_bad_request(result, "description");
    Ok(())
}
