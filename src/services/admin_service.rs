use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record_audit},
    dto::admin::{
        ActiveFlag, CatalogKind, CreateCategoryRequest, CreateCountryRequest,
        CreateProductCategoryRequest, CreateProductImageRequest, CreateProductRequest,
        CreateServiceRequest, UpdateCategoryRequest, UpdateProductRequest, UploadResponse,
    },
    entity::{
        categories::{self, ActiveModel as CategoryActive, Entity as Categories},
        countries::{self, ActiveModel as CountryActive, Entity as Countries},
        product_categories::{self, ActiveModel as ProductCategoryActive, Entity as ProductCategories},
        product_images::{self, ActiveModel as ProductImageActive, Entity as ProductImages},
        products::{self, ActiveModel as ProductActive, Entity as Products},
        services::{self, ActiveModel as ServiceActive, Entity as Services},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Country, Product, ProductCategory, ProductImage, Service},
    response::{ApiResponse, Meta},
    services::catalog_query::escape_like,
    slug::{
        category_slug_base, is_unique_violation, next_free_slug, product_category_slug,
        product_slug, slugify, with_slug_retry,
    },
    state::AppState,
    storage::UploadFolder,
};

/// NUMERIC(10, 2)
const MAX_PRICE_EXCLUSIVE: i64 = 100_000_000;

fn validate_price(price: Decimal) -> AppResult<Decimal> {
    let price = price.round_dp(2);
    if price.is_sign_negative() || price >= Decimal::from(MAX_PRICE_EXCLUSIVE) {
        return Err(AppError::BadRequest(
            "price must be between 0 and 99999999.99".into(),
        ));
    }
    Ok(price)
}

// Column widths from migrations/0001_init.sql.
const NAME_MAX: usize = 100;
const TITLE_MAX: usize = 200;
const SHORT_TEXT_MAX: usize = 100;
const ORG_MAX: usize = 200;
const SERVICE_DESCRIPTION_MAX: usize = 500;
const PRODUCT_SLUG_MAX: usize = 250;

fn require_name(value: &str, field: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    max_len(value, field, max)
}

fn max_len(value: &str, field: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn validate_year(year: Option<i16>) -> AppResult<()> {
    match year {
        Some(year) if year < 0 => Err(AppError::BadRequest("year must not be negative".into())),
        _ => Ok(()),
    }
}

/// Field checks shared by product create and update; `None` skips a field.
fn validate_product_text(
    delivery_time: Option<&str>,
    company: Option<&str>,
    brand: Option<&str>,
    size: Option<&str>,
    condition: Option<&str>,
) -> AppResult<()> {
    let checks = [
        (delivery_time, "delivery_time", SHORT_TEXT_MAX),
        (company, "company", ORG_MAX),
        (brand, "brand", ORG_MAX),
        (size, "size", SHORT_TEXT_MAX),
        (condition, "condition", SHORT_TEXT_MAX),
    ];
    for (value, field, max) in checks {
        if let Some(value) = value {
            max_len(value, field, max)?;
        }
    }
    Ok(())
}

/// Slugs already taken by the category candidates for `name`, optionally
/// ignoring one row (the category being renamed).
pub async fn existing_category_slugs<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<HashSet<String>, DbErr> {
    let base = category_slug_base(name);
    let mut finder = Categories::find()
        .select_only()
        .column(categories::Column::Slug)
        .filter(
            Condition::any()
                .add(categories::Column::Slug.eq(base.as_str()))
                .add(Expr::col(categories::Column::Slug).like(format!("{}-%", escape_like(&base)))),
        );
    if let Some(id) = exclude {
        finder = finder.filter(categories::Column::Id.ne(id));
    }
    let slugs: Vec<String> = finder.into_tuple().all(db).await?;
    Ok(slugs.into_iter().collect())
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    require_name(&payload.name, "name", NAME_MAX)?;

    let orm = &state.orm;
    let payload = &payload;
    let id = Uuid::new_v4();
    let category = with_slug_retry("category", move |_| async move {
        let existing = existing_category_slugs(orm, &payload.name, None).await?;
        let slug = next_free_slug(&payload.name, &existing);
        CategoryActive {
            id: Set(id),
            name: Set(payload.name.clone()),
            slug: Set(slug),
            image: Set(payload.image.clone()),
            description: Set(payload.description.clone()),
            color: Set(payload.color.unwrap_or_default()),
            is_active: Set(payload.is_active.unwrap_or(true)),
        }
        .insert(orm)
        .await
    })
    .await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CategoryCreate,
        serde_json::json!({ "category_id": category.id, "slug": category.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// A rename regenerates the slug with the row's own slug treated as free.
pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let renamed = payload
        .name
        .as_ref()
        .filter(|name| **name != existing.name)
        .cloned();
    if let Some(name) = &renamed {
        require_name(name, "name", NAME_MAX)?;
    }

    let mut active: CategoryActive = existing.into();
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(description) = payload.description {
        // an empty description clears it
        let description = Some(description).filter(|d| !d.trim().is_empty());
        active.description = Set(description);
    }
    if let Some(color) = payload.color {
        active.color = Set(color);
    }

    let orm = &state.orm;
    let category = match renamed {
        Some(name) => {
            let active = &active;
            let name = &name;
            with_slug_retry("category", move |_| async move {
                let existing = existing_category_slugs(orm, name, Some(id)).await?;
                let mut attempt = active.clone();
                attempt.name = Set(name.clone());
                attempt.slug = Set(next_free_slug(name, &existing));
                attempt.update(orm).await
            })
            .await?
        }
        None => active.update(orm).await?,
    };

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CategoryUpdate,
        serde_json::json!({ "category_id": category.id, "slug": category.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// Cascades to product categories, their products and product images.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CategoryDelete,
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(deleted())
}

pub async fn create_product_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductCategoryRequest,
) -> AppResult<ApiResponse<ProductCategory>> {
    ensure_admin(user)?;
    require_name(&payload.name, "name", NAME_MAX)?;
    Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Category not found".into()))?;

    let orm = &state.orm;
    let payload = &payload;
    let id = Uuid::new_v4();
    let product_category = with_slug_retry("product_category", move |_| async move {
        let slug = product_category_slug(&payload.name, &mut rand::thread_rng());
        ProductCategoryActive {
            id: Set(id),
            name: Set(payload.name.clone()),
            slug: Set(slug),
            category_id: Set(payload.category_id),
            is_active: Set(payload.is_active.unwrap_or(true)),
        }
        .insert(orm)
        .await
    })
    .await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductCategoryCreate,
        serde_json::json!({ "product_category_id": product_category.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product category created",
        ProductCategory::from(product_category),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = ProductCategories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductCategoryDelete,
        serde_json::json!({ "product_category_id": id }),
    )
    .await;

    Ok(deleted())
}

pub async fn create_country(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCountryRequest,
) -> AppResult<ApiResponse<Country>> {
    ensure_admin(user)?;
    require_name(&payload.name, "name", NAME_MAX)?;
    let country = CountryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        icon: Set(payload.icon),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CountryCreate,
        serde_json::json!({ "country_id": country.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Country created",
        Country::from(country),
        Some(Meta::empty()),
    ))
}

/// Products keep existing; their country reference becomes null.
pub async fn delete_country(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Countries::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::CountryDelete,
        serde_json::json!({ "country_id": id }),
    )
    .await;

    Ok(deleted())
}

async fn ensure_product_refs(
    state: &AppState,
    product_category_id: Option<Uuid>,
    country_id: Option<Uuid>,
) -> AppResult<()> {
    if let Some(id) = product_category_id {
        ProductCategories::find_by_id(id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::BadRequest("Product category not found".into()))?;
    }
    if let Some(id) = country_id {
        Countries::find_by_id(id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::BadRequest("Country not found".into()))?;
    }
    Ok(())
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    require_name(&payload.title, "title", TITLE_MAX)?;
    validate_year(payload.year)?;
    validate_product_text(
        Some(&payload.delivery_time),
        Some(&payload.company),
        Some(&payload.brand),
        Some(&payload.size),
        Some(&payload.condition),
    )?;
    let price = validate_price(payload.price)?;
    ensure_product_refs(state, Some(payload.product_category_id), payload.country_id).await?;

    let orm = &state.orm;
    let payload = &payload;
    let id = Uuid::new_v4();
    let product = with_slug_retry("product", move |_| async move {
        let slug = product_slug(&payload.title, &mut rand::thread_rng());
        ProductActive {
            id: Set(id),
            title: Set(payload.title.clone()),
            slug: Set(slug),
            description: Set(payload.description.clone()),
            main_image: Set(payload.main_image.clone()),
            price: Set(price),
            country_id: Set(payload.country_id),
            product_category_id: Set(payload.product_category_id),
            quantity: Set(payload.quantity.unwrap_or(0).max(0)),
            review: Set(payload.review.unwrap_or(0).max(0)),
            year: Set(payload.year),
            delivery_time: Set(payload.delivery_time.clone()),
            star: Set(payload.star.unwrap_or(0).max(0)),
            company: Set(payload.company.clone()),
            brand: Set(payload.brand.clone()),
            size: Set(payload.size.clone()),
            discount: Set(payload.discount.unwrap_or(0).max(0)),
            color: Set(payload.color),
            verified: Set(payload.verified),
            recommended: Set(payload.recommended),
            condition: Set(payload.condition.clone()),
            is_active: Set(payload.is_active.unwrap_or(true)),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await
    })
    .await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductCreate,
        serde_json::json!({ "product_id": product.id, "slug": product.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// The slug survives every update unless the payload sends one: an empty
/// value regenerates it, anything else is normalized and stored as given.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if let Some(title) = payload.title.as_deref() {
        require_name(title, "title", TITLE_MAX)?;
    }
    validate_year(payload.year)?;
    validate_product_text(
        payload.delivery_time.as_deref(),
        payload.company.as_deref(),
        payload.brand.as_deref(),
        payload.size.as_deref(),
        payload.condition.as_deref(),
    )?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_product_refs(state, payload.product_category_id, payload.country_id).await?;

    let title = payload.title.clone().unwrap_or_else(|| existing.title.clone());
    let mut active: ProductActive = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(main_image) = payload.main_image {
        active.main_image = Set(main_image);
    }
    if let Some(price) = payload.price {
        active.price = Set(validate_price(price)?);
    }
    if let Some(country_id) = payload.country_id {
        active.country_id = Set(Some(country_id));
    }
    if let Some(product_category_id) = payload.product_category_id {
        active.product_category_id = Set(product_category_id);
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity.max(0));
    }
    if let Some(review) = payload.review {
        active.review = Set(review.max(0));
    }
    if let Some(year) = payload.year {
        active.year = Set(Some(year));
    }
    if let Some(delivery_time) = payload.delivery_time {
        active.delivery_time = Set(delivery_time);
    }
    if let Some(star) = payload.star {
        active.star = Set(star.max(0));
    }
    if let Some(company) = payload.company {
        active.company = Set(company);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(size) = payload.size {
        active.size = Set(size);
    }
    if let Some(discount) = payload.discount {
        active.discount = Set(discount.max(0));
    }
    if let Some(color) = payload.color {
        active.color = Set(Some(color));
    }
    if let Some(verified) = payload.verified {
        active.verified = Set(verified);
    }
    if let Some(recommended) = payload.recommended {
        active.recommended = Set(recommended);
    }
    if let Some(condition) = payload.condition {
        active.condition = Set(condition);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let orm = &state.orm;
    let product = match payload.slug.as_deref().map(str::trim) {
        None => active.update(orm).await?,
        Some("") => {
            let active = &active;
            let title = &title;
            with_slug_retry("product", move |_| async move {
                let mut attempt = active.clone();
                attempt.slug = Set(product_slug(title, &mut rand::thread_rng()));
                attempt.update(orm).await
            })
            .await?
        }
        Some(explicit) => {
            let slug = slugify(explicit);
            if slug.is_empty() {
                return Err(AppError::BadRequest("slug must contain letters or digits".into()));
            }
            max_len(&slug, "slug", PRODUCT_SLUG_MAX)?;
            active.slug = Set(slug);
            active.update(orm).await.map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::Conflict("slug is already in use".into())
                } else {
                    AppError::from(err)
                }
            })?
        }
    };

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductUpdate,
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductDelete,
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(deleted())
}

pub async fn create_product_image(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;
    Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Product not found".into()))?;

    let image = ProductImageActive {
        id: Set(Uuid::new_v4()),
        image: Set(payload.image),
        product_id: Set(payload.product_id),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductImageCreate,
        serde_json::json!({ "product_image_id": image.id, "product_id": image.product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product image created",
        ProductImage::from(image),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = ProductImages::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductImageDelete,
        serde_json::json!({ "product_image_id": id }),
    )
    .await;

    Ok(deleted())
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    ensure_admin(user)?;
    require_name(&payload.title, "title", TITLE_MAX)?;
    max_len(&payload.description, "description", SERVICE_DESCRIPTION_MAX)?;
    let service = ServiceActive {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        image: Set(payload.image),
        description: Set(payload.description),
        is_active: Set(payload.is_active.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ServiceCreate,
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service created",
        Service::from(service),
        Some(Meta::empty()),
    ))
}

pub async fn delete_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Services::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ServiceDelete,
        serde_json::json!({ "service_id": id }),
    )
    .await;

    Ok(deleted())
}

/// Soft delete (or restore) a row of any catalog kind.
pub async fn set_active(
    state: &AppState,
    user: &AuthUser,
    kind: CatalogKind,
    id: Uuid,
    is_active: bool,
) -> AppResult<ApiResponse<ActiveFlag>> {
    ensure_admin(user)?;
    let orm = &state.orm;
    let rows = match kind {
        CatalogKind::Categories => {
            Categories::update_many()
                .col_expr(categories::Column::IsActive, Expr::value(is_active))
                .filter(categories::Column::Id.eq(id))
                .exec(orm)
                .await?
                .rows_affected
        }
        CatalogKind::ProductCategories => {
            ProductCategories::update_many()
                .col_expr(product_categories::Column::IsActive, Expr::value(is_active))
                .filter(product_categories::Column::Id.eq(id))
                .exec(orm)
                .await?
                .rows_affected
        }
        CatalogKind::Countries => {
            Countries::update_many()
                .col_expr(countries::Column::IsActive, Expr::value(is_active))
                .filter(countries::Column::Id.eq(id))
                .exec(orm)
                .await?
                .rows_affected
        }
        CatalogKind::Products => {
            Products::update_many()
                .col_expr(products::Column::IsActive, Expr::value(is_active))
                .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
                .filter(products::Column::Id.eq(id))
                .exec(orm)
                .await?
                .rows_affected
        }
        CatalogKind::ProductImages => {
            ProductImages::update_many()
                .col_expr(product_images::Column::IsActive, Expr::value(is_active))
                .filter(product_images::Column::Id.eq(id))
                .exec(orm)
                .await?
                .rows_affected
        }
        CatalogKind::Services => {
            Services::update_many()
                .col_expr(services::Column::IsActive, Expr::value(is_active))
                .filter(services::Column::Id.eq(id))
                .exec(orm)
                .await?
                .rows_affected
        }
    };
    if rows == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ActiveFlagChange,
        serde_json::json!({ "kind": kind, "id": id, "is_active": is_active }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        ActiveFlag { kind, id, is_active },
        Some(Meta::empty()),
    ))
}

pub async fn store_upload(
    state: &AppState,
    user: &AuthUser,
    folder: UploadFolder,
    file_name: &str,
    bytes: &[u8],
) -> AppResult<ApiResponse<UploadResponse>> {
    ensure_admin(user)?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("file is empty".into()));
    }
    let url = state.blobs.put(folder, file_name, bytes).await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::Upload,
        serde_json::json!({ "folder": folder.as_path(), "url": url }),
    )
    .await;

    Ok(ApiResponse::success(
        "Uploaded",
        UploadResponse { url },
        Some(Meta::empty()),
    ))
}

fn deleted() -> ApiResponse<serde_json::Value> {
    ApiResponse::success("Deleted", serde_json::json!({}), Some(Meta::empty()))
}
