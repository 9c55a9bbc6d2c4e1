use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{delete, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::admin::{
        ActiveFlag, CatalogKind, CreateCategoryRequest, CreateCountryRequest,
        CreateProductCategoryRequest, CreateProductImageRequest, CreateProductRequest,
        CreateServiceRequest, SetActiveRequest, UpdateCategoryRequest, UpdateProductRequest,
        UploadResponse,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Country, Product, ProductCategory, ProductImage, Service},
    response::ApiResponse,
    services::admin_service,
    state::AppState,
    storage::UploadFolder,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/product-categories", post(create_product_category))
        .route("/product-categories/{id}", delete(delete_product_category))
        .route("/countries", post(create_country))
        .route("/countries/{id}", delete(delete_country))
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/product-images", post(create_product_image))
        .route("/product-images/{id}", delete(delete_product_image))
        .route("/services", post(create_service))
        .route("/services/{id}", delete(delete_service))
        .route("/{kind}/{id}/active", patch(set_active))
        .route("/uploads", post(upload))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "No free slug"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category and everything under it deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/product-categories",
    request_body = CreateProductCategoryRequest,
    responses(
        (status = 200, description = "Product category created", body = ApiResponse<ProductCategory>),
        (status = 400, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductCategoryRequest>,
) -> AppResult<Json<ApiResponse<ProductCategory>>> {
    let resp = admin_service::create_product_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/product-categories/{id}",
    params(("id" = Uuid, Path, description = "Product category ID")),
    responses(
        (status = 200, description = "Product category deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_product_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/countries",
    request_body = CreateCountryRequest,
    responses(
        (status = 200, description = "Country created", body = ApiResponse<Country>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_country(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCountryRequest>,
) -> AppResult<Json<ApiResponse<Country>>> {
    let resp = admin_service::create_country(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/countries/{id}",
    params(("id" = Uuid, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Country deleted, products detached", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Country not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_country(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_country(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid price or unknown references"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/product-images",
    request_body = CreateProductImageRequest,
    responses(
        (status = 200, description = "Product image created", body = ApiResponse<ProductImage>),
        (status = 400, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product_image(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductImageRequest>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    let resp = admin_service::create_product_image(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/product-images/{id}",
    params(("id" = Uuid, Path, description = "Product image ID")),
    responses(
        (status = 200, description = "Product image deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product image not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_product_image(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 200, description = "Service created", body = ApiResponse<Service>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = admin_service::create_service(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Service not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_service(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/{kind}/{id}/active",
    params(
        ("kind" = CatalogKind, Path, description = "categories, product-categories, countries, products, product-images or services"),
        ("id" = Uuid, Path, description = "Row ID")
    ),
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Active flag changed", body = ApiResponse<ActiveFlag>),
        (status = 404, description = "Row not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_active(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(CatalogKind, Uuid)>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<Json<ApiResponse<ActiveFlag>>> {
    let resp = admin_service::set_active(&state, &user, kind, id, payload.is_active).await?;
    Ok(Json(resp))
}

/// Multipart form with a `folder` field and a `file` field.
#[utoipa::path(
    post,
    path = "/api/admin/uploads",
    request_body(content_type = "multipart/form-data", description = "`folder` and `file` fields"),
    responses(
        (status = 200, description = "Stored file reference", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing or invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    ensure_admin(&user)?;
    let mut folder: Option<UploadFolder> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(error = %e, "failed to read multipart field");
        AppError::BadRequest(format!("Failed to read multipart data: {e}"))
    })? {
        match field.name().unwrap_or("") {
            "folder" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read folder: {e}")))?;
                folder = Some(
                    UploadFolder::parse(&value)
                        .ok_or_else(|| AppError::BadRequest(format!("Unknown folder {value}")))?,
                );
            }
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let folder = folder.ok_or_else(|| AppError::BadRequest("folder is required".into()))?;
    let (name, bytes) = file.ok_or_else(|| AppError::BadRequest("file is required".into()))?;
    let resp = admin_service::store_upload(&state, &user, folder, &name, &bytes).await?;
    Ok(Json(resp))
}
