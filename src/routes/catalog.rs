use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{
        CategoryDetailPage, CategoryList, HomePage, ProductDetailPage, ProductListPage,
        SearchPage, ServiceList,
    },
    error::AppResult,
    response::ApiResponse,
    routes::params::{CatalogParams, PageParams},
    services::{catalog_query::ListingVariant, catalog_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/categories", get(list_categories))
        .route("/categories/{slug}", get(category_detail))
        .route("/products", get(list_products))
        .route("/products/large", get(list_products_large))
        .route("/products/{slug}", get(product_detail))
        .route("/search", get(search))
        .route("/services", get(list_services))
}

#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Home page context", body = ApiResponse<HomePage>)
    ),
    tag = "Catalog"
)]
pub async fn home(State(state): State<AppState>) -> AppResult<Json<ApiResponse<HomePage>>> {
    let resp = catalog_service::home(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Active categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug"),
        PageParams
    ),
    responses(
        (status = 200, description = "Category with its product categories and products", body = ApiResponse<CategoryDetailPage>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Catalog"
)]
pub async fn category_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<ApiResponse<CategoryDetailPage>>> {
    let resp = catalog_service::category_detail(&state, &slug, params.page.as_deref()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(CatalogParams),
    responses(
        (status = 200, description = "Product listing, 12 per page", body = ApiResponse<ProductListPage>)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<ApiResponse<ProductListPage>>> {
    let resp = catalog_service::list_products(&state, params, ListingVariant::Standard).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/large",
    params(CatalogParams),
    responses(
        (status = 200, description = "Large product listing, 10 per page, also filters by company and size", body = ApiResponse<ProductListPage>)
    ),
    tag = "Catalog"
)]
pub async fn list_products_large(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<ApiResponse<ProductListPage>>> {
    let resp = catalog_service::list_products(&state, params, ListingVariant::Large).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product with images and related products", body = ApiResponse<ProductDetailPage>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetailPage>>> {
    let resp = catalog_service::product_detail(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(CatalogParams),
    responses(
        (status = 200, description = "Products matching `q`", body = ApiResponse<SearchPage>)
    ),
    tag = "Catalog"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<ApiResponse<SearchPage>>> {
    let resp = catalog_service::search_products(&state, params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services",
    responses(
        (status = 200, description = "Active services", body = ApiResponse<ServiceList>)
    ),
    tag = "Catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = catalog_service::list_services(&state).await?;
    Ok(Json(resp))
}
