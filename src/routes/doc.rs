use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            ActiveFlag, CatalogKind, CreateCategoryRequest, CreateCountryRequest,
            CreateProductCategoryRequest, CreateProductImageRequest, CreateProductRequest,
            CreateServiceRequest, SetActiveRequest, UpdateCategoryRequest, UpdateProductRequest,
            UploadResponse,
        },
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        catalog::{
            CategoryDetailPage, CategoryList, HomePage, ProductDetailPage, ProductListPage,
            SearchPage, ServiceList,
        },
        profile::{ProfileOrdersPage, ProfilePage, UpdateProfileRequest, WishlistPage},
    },
    entity::sea_orm_active_enums::{Color, UserRole},
    models::{Category, Country, Product, ProductCategory, ProductImage, Service, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, catalog, health, params, profile},
    services::profile_service::{ProfileContext, RecentOrder},
    storage::UploadFolder,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        catalog::home,
        catalog::list_categories,
        catalog::category_detail,
        catalog::list_products,
        catalog::list_products_large,
        catalog::product_detail,
        catalog::search,
        catalog::list_services,
        profile::get_profile,
        profile::update_profile,
        profile::profile_orders,
        profile::profile_wishlist,
        profile::seller_dashboard,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::create_product_category,
        admin::delete_product_category,
        admin::create_country,
        admin::delete_country,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::create_product_image,
        admin::delete_product_image,
        admin::create_service,
        admin::delete_service,
        admin::set_active,
        admin::upload
    ),
    components(
        schemas(
            User,
            UserRole,
            Color,
            Category,
            ProductCategory,
            Country,
            Product,
            ProductImage,
            Service,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ProductListPage,
            SearchPage,
            CategoryDetailPage,
            ProductDetailPage,
            HomePage,
            CategoryList,
            ServiceList,
            ProfilePage,
            ProfileContext,
            RecentOrder,
            UpdateProfileRequest,
            ProfileOrdersPage,
            WishlistPage,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateProductCategoryRequest,
            CreateCountryRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateProductImageRequest,
            CreateServiceRequest,
            SetActiveRequest,
            CatalogKind,
            ActiveFlag,
            UploadFolder,
            UploadResponse,
            params::CatalogParams,
            params::PageParams,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductListPage>,
            ApiResponse<ProductDetailPage>,
            ApiResponse<ProfilePage>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Storefront browsing, search and product detail"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Profile", description = "Account dashboard endpoints"),
        (name = "Admin", description = "Catalog maintenance endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
