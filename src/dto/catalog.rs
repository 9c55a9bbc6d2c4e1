use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Country, Product, ProductCategory, ProductImage, Service};

/// Context for both product listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListPage {
    pub products: Vec<Product>,
    pub categories: Vec<ProductCategory>,
    pub countries: Vec<Country>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchPage {
    pub products: Vec<Product>,
    pub search_query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetailPage {
    pub category: Category,
    pub product_categories: Vec<ProductCategory>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailPage {
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub related_products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub categories: Vec<Category>,
    pub recommended_products: Vec<Product>,
    pub services: Vec<Service>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceList {
    pub items: Vec<Service>,
}
