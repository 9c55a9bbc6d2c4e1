use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use crate::{
    dto::catalog::{
        CategoryDetailPage, CategoryList, HomePage, ProductDetailPage, ProductListPage,
        SearchPage, ServiceList,
    },
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        countries::{Column as CountryCol, Entity as Countries},
        product_categories::{Column as ProductCategoryCol, Entity as ProductCategories},
        product_images::{Column as ImageCol, Entity as ProductImages},
        products::{Column as ProductCol, Entity as Products, Model as ProductModel},
        services::{Column as ServiceCol, Entity as Services},
    },
    error::{AppError, AppResult},
    models::{Category, Country, Product, ProductCategory, ProductImage, Service},
    response::{ApiResponse, Meta},
    routes::params::{CatalogParams, PageRequest},
    services::catalog_query::{
        self, ListingVariant, ProductFilter, STANDARD_PAGE_SIZE, active_only,
    },
    state::AppState,
};

pub const RELATED_PRODUCTS_LIMIT: u64 = 4;
pub const HOME_RECOMMENDED_LIMIT: u64 = 8;

/// Runs a product select as one page. Pages past the end come back empty.
pub async fn fetch_page<C: ConnectionTrait>(
    db: &C,
    select: Select<Products>,
    page: PageRequest,
) -> AppResult<(Vec<Product>, u64)> {
    let total = select.clone().count(db).await?;
    if page.offset() >= total {
        return Ok((Vec::new(), total));
    }
    let items = select
        .limit(page.per_page)
        .offset(page.offset())
        .all(db)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok((items, total))
}

pub async fn list_products(
    state: &AppState,
    params: CatalogParams,
    variant: ListingVariant,
) -> AppResult<ApiResponse<ProductListPage>> {
    let filter = ProductFilter::from_params(&params, variant);
    let page = PageRequest::new(params.page.as_deref(), variant.page_size());
    tracing::debug!(?filter, page = page.page, "listing products");

    let (products, total) = fetch_page(&state.orm, filter.select(), page).await?;
    let categories = active_product_categories(state).await?;
    let countries = active_countries(state).await?;

    let data = ProductListPage {
        products,
        categories,
        countries,
    };
    Ok(ApiResponse::success(
        "Products",
        data,
        Some(Meta::for_page(page, total)),
    ))
}

pub async fn search_products(
    state: &AppState,
    params: CatalogParams,
) -> AppResult<ApiResponse<SearchPage>> {
    let filter = ProductFilter::from_params(&params, ListingVariant::Search);
    let page = PageRequest::new(params.page.as_deref(), ListingVariant::Search.page_size());

    let (products, total) = fetch_page(&state.orm, filter.select(), page).await?;

    let data = SearchPage {
        products,
        search_query: params.q.unwrap_or_default(),
    };
    Ok(ApiResponse::success(
        "Search",
        data,
        Some(Meta::for_page(page, total)),
    ))
}

pub async fn category_detail(
    state: &AppState,
    slug: &str,
    raw_page: Option<&str>,
) -> AppResult<ApiResponse<CategoryDetailPage>> {
    let category = Categories::find()
        .filter(CategoryCol::Slug.eq(slug))
        .filter(CategoryCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let product_categories = ProductCategories::find()
        .filter(ProductCategoryCol::CategoryId.eq(category.id))
        .filter(ProductCategoryCol::IsActive.eq(true))
        .order_by_asc(ProductCategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductCategory::from)
        .collect();

    let page = PageRequest::new(raw_page, STANDARD_PAGE_SIZE);
    let (products, total) = fetch_page(
        &state.orm,
        catalog_query::category_products(category.id),
        page,
    )
    .await?;

    let data = CategoryDetailPage {
        category: Category::from(category),
        product_categories,
        products,
    };
    Ok(ApiResponse::success(
        "Category",
        data,
        Some(Meta::for_page(page, total)),
    ))
}

pub async fn product_detail(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<ProductDetailPage>> {
    let product: ProductModel = Products::find()
        .filter(ProductCol::Slug.eq(slug))
        .filter(active_only())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let images = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product.id))
        .filter(ImageCol::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductImage::from)
        .collect();

    let related_products = catalog_query::related_products(product.id, product.product_category_id)
        .limit(RELATED_PRODUCTS_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let data = ProductDetailPage {
        product: Product::from(product),
        images,
        related_products,
    };
    Ok(ApiResponse::success("Product", data, None))
}

pub async fn home(state: &AppState) -> AppResult<ApiResponse<HomePage>> {
    let categories = active_categories(state).await?;

    let recommended_products = Products::find()
        .filter(active_only().add(ProductCol::Recommended.eq(true)))
        .order_by_desc(ProductCol::CreatedAt)
        .limit(HOME_RECOMMENDED_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let services = active_services(state).await?;

    let data = HomePage {
        categories,
        recommended_products,
        services,
    };
    Ok(ApiResponse::success("Home", data, Some(Meta::empty())))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = active_categories(state).await?;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_services(state: &AppState) -> AppResult<ApiResponse<ServiceList>> {
    let items = active_services(state).await?;
    Ok(ApiResponse::success(
        "Services",
        ServiceList { items },
        Some(Meta::empty()),
    ))
}

async fn active_categories(state: &AppState) -> AppResult<Vec<Category>> {
    Ok(Categories::find()
        .filter(CategoryCol::IsActive.eq(true))
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect())
}

async fn active_product_categories(state: &AppState) -> AppResult<Vec<ProductCategory>> {
    Ok(ProductCategories::find()
        .filter(ProductCategoryCol::IsActive.eq(true))
        .order_by_asc(ProductCategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductCategory::from)
        .collect())
}

async fn active_countries(state: &AppState) -> AppResult<Vec<Country>> {
    Ok(Countries::find()
        .filter(CountryCol::IsActive.eq(true))
        .order_by_asc(CountryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Country::from)
        .collect())
}

async fn active_services(state: &AppState) -> AppResult<Vec<Service>> {
    Ok(Services::find()
        .filter(ServiceCol::IsActive.eq(true))
        .order_by_asc(ServiceCol::Title)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect())
}
