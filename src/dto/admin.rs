use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::sea_orm_active_enums::Color;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub image: String,
    pub description: Option<String>,
    pub color: Option<Color>,
    pub is_active: Option<bool>,
}

/// Omitted fields are left untouched; an empty `description` clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub color: Option<Color>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductCategoryRequest {
    pub name: String,
    pub category_id: Uuid,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCountryRequest {
    pub name: String,
    pub icon: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub main_image: String,
    #[schema(value_type = String, example = "999.00")]
    pub price: Decimal,
    pub country_id: Option<Uuid>,
    pub product_category_id: Uuid,
    pub quantity: Option<i32>,
    pub review: Option<i32>,
    pub year: Option<i16>,
    pub delivery_time: String,
    pub star: Option<i16>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub size: String,
    pub discount: Option<i16>,
    pub color: Option<Color>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub condition: String,
    pub is_active: Option<bool>,
}

/// Omitted fields are left untouched. `slug` is only changed when present:
/// an empty string asks for a freshly generated slug.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub main_image: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub country_id: Option<Uuid>,
    pub product_category_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub review: Option<i32>,
    pub year: Option<i16>,
    pub delivery_time: Option<String>,
    pub star: Option<i16>,
    pub company: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub discount: Option<i16>,
    pub color: Option<Color>,
    pub verified: Option<bool>,
    pub recommended: Option<bool>,
    pub condition: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductImageRequest {
    pub product_id: Uuid,
    pub image: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub title: String,
    pub image: String,
    pub description: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Entity kinds that carry a soft-delete flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    Categories,
    ProductCategories,
    Countries,
    Products,
    ProductImages,
    Services,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveFlag {
    pub kind: CatalogKind,
    pub id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}
