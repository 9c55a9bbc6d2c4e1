use std::sync::Arc;

use rust_decimal::Decimal;
use storefront_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        admin::{
            CatalogKind, CreateCategoryRequest, CreateCountryRequest, CreateProductCategoryRequest,
            CreateProductImageRequest, CreateProductRequest, UpdateCategoryRequest,
            UpdateProductRequest,
        },
        auth::{LoginRequest, RegisterRequest},
    },
    entity::{
        product_images::Entity as ProductImages, products::Entity as Products,
        sea_orm_active_enums::UserRole,
    },
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    routes::params::CatalogParams,
    services::{
        admin_service, auth_service,
        catalog_query::ListingVariant,
        catalog_service,
        profile_service::{self, ProfileContextBuilder},
    },
    state::AppState,
    storage::LocalBlobStore,
};
use sea_orm::EntityTrait;
use uuid::Uuid;

const JWT_SECRET: &str = "catalog-flow-secret";

fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run catalog flow tests.");
            None
        }
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    let media_root = std::env::temp_dir().join(format!("storefront-media-{}", Uuid::new_v4()));
    Ok(AppState {
        pool,
        orm,
        jwt_secret: Arc::from(JWT_SECRET),
        blobs: Arc::new(LocalBlobStore::new(media_root, "/media")),
        profile: ProfileContextBuilder::new(None),
    })
}

async fn register_and_login(state: &AppState, tag: &str) -> anyhow::Result<AuthUser> {
    let email = format!("{tag}@example.com");
    auth_service::register_user(
        state,
        RegisterRequest {
            username: tag.to_string(),
            email: email.clone(),
            password: "secret123".into(),
            phone: String::new(),
            address: String::new(),
        },
    )
    .await?;

    let login = auth_service::login_user(
        state,
        LoginRequest {
            email,
            password: "secret123".into(),
        },
    )
    .await?;
    let login = login.data.expect("login");
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.user.username, tag);
    Ok(decode_token(&login.token, JWT_SECRET)?)
}

fn product_request(title: &str, product_category_id: Uuid, price: i64) -> CreateProductRequest {
    CreateProductRequest {
        title: title.to_string(),
        description: format!("{title} description"),
        main_image: "/media/products/main_images/x.png".into(),
        price: Decimal::new(price, 2),
        country_id: None,
        product_category_id,
        quantity: Some(5),
        review: None,
        year: Some(2024),
        delivery_time: "2 days".into(),
        star: Some(4),
        company: String::new(),
        brand: String::new(),
        size: String::new(),
        discount: None,
        color: None,
        verified: false,
        recommended: false,
        condition: "new".into(),
        is_active: None,
    }
}

#[tokio::test]
async fn storefront_catalog_flow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let run = Uuid::new_v4().simple().to_string()[..8].to_string();

    // Accounts: registration always yields a customer.
    let customer = register_and_login(&state, &format!("customer{run}")).await?;
    assert_eq!(customer.role, UserRole::Customer);
    let admin = AuthUser {
        user_id: customer.user_id,
        role: UserRole::Admin,
    };

    let forbidden = admin_service::create_country(
        &state,
        &customer,
        CreateCountryRequest {
            name: "Nowhere".into(),
            icon: "x.png".into(),
            is_active: None,
        },
    )
    .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    // Category slugs: the second identical name gets the `-1` candidate.
    let name = format!("Shoes {run}");
    let first = admin_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: name.clone(),
            image: "shoes.png".into(),
            description: None,
            color: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("category");
    let second = admin_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: name.clone(),
            image: "shoes.png".into(),
            description: None,
            color: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(first.slug, format!("shoes-{run}"));
    assert_eq!(second.slug, format!("shoes-{run}-1"));

    // Saving without a rename keeps the slug.
    let unchanged = admin_service::update_category(
        &state,
        &admin,
        first.id,
        UpdateCategoryRequest {
            description: Some("All shoes".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(unchanged.slug, first.slug);

    let phones = admin_service::create_product_category(
        &state,
        &admin,
        CreateProductCategoryRequest {
            name: "Phones".into(),
            category_id: first.id,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("product category");
    assert!(phones.slug.starts_with("phones-"));

    let country = admin_service::create_country(
        &state,
        &admin,
        CreateCountryRequest {
            name: format!("Country {run}"),
            icon: "flag.png".into(),
            is_active: None,
        },
    )
    .await?
    .data
    .expect("country");

    let company = format!("acme{run}");
    let mut iphone = product_request("iPhone 15", phones.id, 99900);
    iphone.verified = true;
    iphone.company = company.clone();
    iphone.country_id = Some(country.id);
    let iphone = admin_service::create_product(&state, &admin, iphone)
        .await?
        .data
        .expect("product");
    assert!(iphone.slug.starts_with("iphone-15-"));

    let mut pixel = product_request("Pixel 8", phones.id, 69900);
    pixel.company = company.clone();
    let pixel = admin_service::create_product(&state, &admin, pixel)
        .await?
        .data
        .expect("product");

    let invalid_price = admin_service::create_product(
        &state,
        &admin,
        product_request("Broken", phones.id, -100),
    )
    .await;
    assert!(matches!(invalid_price, Err(AppError::BadRequest(_))));

    // Standard listing filtered by product category slug.
    let listing = catalog_service::list_products(
        &state,
        CatalogParams {
            category: Some(phones.slug.clone()),
            ..Default::default()
        },
        ListingVariant::Standard,
    )
    .await?;
    let products = listing.data.expect("listing").products;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, pixel.id, "newest first");

    let expensive = catalog_service::list_products(
        &state,
        CatalogParams {
            category: Some(phones.slug.clone()),
            min_price: Some("1000".into()),
            ..Default::default()
        },
        ListingVariant::Standard,
    )
    .await?;
    assert!(expensive.data.expect("listing").products.is_empty());

    let verified = catalog_service::list_products(
        &state,
        CatalogParams {
            category: Some(phones.slug.clone()),
            verified: Some("true".into()),
            ..Default::default()
        },
        ListingVariant::Standard,
    )
    .await?;
    let verified = verified.data.expect("listing").products;
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].id, iphone.id);

    let past_end = catalog_service::list_products(
        &state,
        CatalogParams {
            category: Some(phones.slug.clone()),
            page: Some("99".into()),
            ..Default::default()
        },
        ListingVariant::Standard,
    )
    .await?;
    assert!(past_end.data.expect("listing").products.is_empty());

    let large = catalog_service::list_products(
        &state,
        CatalogParams {
            company: Some(company.clone()),
            ..Default::default()
        },
        ListingVariant::Large,
    )
    .await?;
    assert_eq!(large.data.expect("listing").products.len(), 2);

    let search = catalog_service::search_products(
        &state,
        CatalogParams {
            q: Some(company.to_uppercase()),
            ..Default::default()
        },
    )
    .await?;
    let search = search.data.expect("search");
    assert_eq!(search.products.len(), 2);
    assert_eq!(search.search_query, company.to_uppercase());

    // Product detail shows active images only and lists the sibling as related.
    let front = admin_service::create_product_image(
        &state,
        &admin,
        CreateProductImageRequest {
            product_id: iphone.id,
            image: "/media/products/images/front.png".into(),
            is_active: None,
        },
    )
    .await?
    .data
    .expect("image");
    admin_service::create_product_image(
        &state,
        &admin,
        CreateProductImageRequest {
            product_id: iphone.id,
            image: "/media/products/images/hidden.png".into(),
            is_active: Some(false),
        },
    )
    .await?;

    let detail = catalog_service::product_detail(&state, &iphone.slug)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.product.id, iphone.id);
    assert_eq!(detail.images.len(), 1);
    assert_eq!(detail.images[0].id, front.id);
    assert_eq!(detail.related_products.len(), 1);
    assert_eq!(detail.related_products[0].id, pixel.id);

    // Related products are capped at four.
    let tablets = admin_service::create_product_category(
        &state,
        &admin,
        CreateProductCategoryRequest {
            name: "Tablets".into(),
            category_id: second.id,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("product category");
    let mut tablets_made = Vec::new();
    for n in 0..6 {
        let tablet = admin_service::create_product(
            &state,
            &admin,
            product_request(&format!("Tablet {n}"), tablets.id, 30000 + n),
        )
        .await?
        .data
        .expect("product");
        tablets_made.push(tablet);
    }
    let tablet_detail = catalog_service::product_detail(&state, &tablets_made[0].slug)
        .await?
        .data
        .expect("detail");
    assert_eq!(tablet_detail.related_products.len(), 4);
    assert!(
        tablet_detail
            .related_products
            .iter()
            .all(|p| p.id != tablets_made[0].id && p.product_category_id == tablets.id)
    );

    // Deleting a product removes its images.
    let tablet_image = admin_service::create_product_image(
        &state,
        &admin,
        CreateProductImageRequest {
            product_id: tablets_made[5].id,
            image: "/media/products/images/tablet.png".into(),
            is_active: None,
        },
    )
    .await?
    .data
    .expect("image");
    admin_service::delete_product(&state, &admin, tablets_made[5].id).await?;
    assert!(ProductImages::find_by_id(tablet_image.id).one(&state.orm).await?.is_none());

    // Paging far past the end is an empty page, not an error.
    let far = catalog_service::list_products(
        &state,
        CatalogParams {
            page: Some("999999999999999999".into()),
            ..Default::default()
        },
        ListingVariant::Standard,
    )
    .await?;
    assert!(far.data.expect("listing").products.is_empty());
    let far = catalog_service::category_detail(&state, &second.slug, Some("18446744073709551615"))
        .await?
        .data
        .expect("category page");
    assert!(far.products.is_empty());

    // Over-long names are rejected before they reach the database.
    let too_long = admin_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "a".repeat(101),
            image: "x.png".into(),
            description: None,
            color: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(too_long, Err(AppError::BadRequest(_))));

    // An empty description clears it.
    let cleared = admin_service::update_category(
        &state,
        &admin,
        second.id,
        UpdateCategoryRequest {
            description: Some("Tablets and more".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(cleared.description.as_deref(), Some("Tablets and more"));
    let cleared = admin_service::update_category(
        &state,
        &admin,
        second.id,
        UpdateCategoryRequest {
            description: Some(String::new()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(cleared.description, None);

    // Editing a product keeps its slug.
    let edited = admin_service::update_product(
        &state,
        &admin,
        iphone.id,
        UpdateProductRequest {
            title: Some("iPhone 15 Pro".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(edited.slug, iphone.slug);

    // Inactive products disappear from listings and detail.
    admin_service::set_active(&state, &admin, CatalogKind::Products, pixel.id, false).await?;
    let listing = catalog_service::list_products(
        &state,
        CatalogParams {
            category: Some(phones.slug.clone()),
            ..Default::default()
        },
        ListingVariant::Standard,
    )
    .await?;
    assert_eq!(listing.data.expect("listing").products.len(), 1);
    assert!(matches!(
        catalog_service::product_detail(&state, &pixel.slug).await,
        Err(AppError::NotFound)
    ));

    // Category detail pages through products of all its product categories.
    let category_page = catalog_service::category_detail(&state, &first.slug, None)
        .await?
        .data
        .expect("category page");
    assert_eq!(category_page.product_categories.len(), 1);
    assert_eq!(category_page.products.len(), 1);

    // Deleting a country detaches its products.
    admin_service::delete_country(&state, &admin, country.id).await?;
    let reloaded = Products::find_by_id(iphone.id)
        .one(&state.orm)
        .await?
        .expect("product survives");
    assert_eq!(reloaded.country_id, None);

    // Deleting a category cascades down to its products.
    admin_service::delete_category(&state, &admin, first.id).await?;
    assert!(Products::find_by_id(iphone.id).one(&state.orm).await?.is_none());
    assert!(ProductImages::find_by_id(front.id).one(&state.orm).await?.is_none());
    assert!(Products::find_by_id(pixel.id).one(&state.orm).await?.is_none());
    assert!(matches!(
        catalog_service::category_detail(&state, &first.slug, None).await,
        Err(AppError::NotFound)
    ));
    admin_service::delete_category(&state, &admin, second.id).await?;
    assert!(Products::find_by_id(tablets_made[0].id).one(&state.orm).await?.is_none());

    // Profile aggregates are empty without an order source.
    let profile = profile_service::get_profile(&state, &customer)
        .await?
        .data
        .expect("profile");
    assert_eq!(profile.context.order_count, 0);
    assert!(matches!(
        profile_service::seller_dashboard(&state, &customer).await,
        Err(AppError::Forbidden)
    ));

    auth_service::logout_user(&state, &customer).await?;
    Ok(())
}
