use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    categories, countries, product_categories, product_images, products,
    sea_orm_active_enums::{Color, UserRole},
    services, users,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub description: Option<String>,
    pub color: Color,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub main_image: String,
    #[schema(value_type = String, example = "999.00")]
    pub price: Decimal,
    pub country_id: Option<Uuid>,
    pub product_category_id: Uuid,
    pub quantity: i32,
    pub review: i32,
    pub year: Option<i16>,
    pub delivery_time: String,
    pub star: i16,
    pub company: String,
    pub brand: String,
    pub size: String,
    pub discount: i16,
    pub color: Option<Color>,
    pub verified: bool,
    pub recommended: bool,
    pub condition: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub image: String,
    pub product_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub description: String,
    pub is_active: bool,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            phone: model.phone,
            address: model.address,
            image: model.image,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            image: model.image,
            description: model.description,
            color: model.color,
            is_active: model.is_active,
        }
    }
}

impl From<product_categories::Model> for ProductCategory {
    fn from(model: product_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            category_id: model.category_id,
            is_active: model.is_active,
        }
    }
}

impl From<countries::Model> for Country {
    fn from(model: countries::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon: model.icon,
            is_active: model.is_active,
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            main_image: model.main_image,
            price: model.price,
            country_id: model.country_id,
            product_category_id: model.product_category_id,
            quantity: model.quantity,
            review: model.review,
            year: model.year,
            delivery_time: model.delivery_time,
            star: model.star,
            company: model.company,
            brand: model.brand,
            size: model.size,
            discount: model.discount,
            color: model.color,
            verified: model.verified,
            recommended: model.recommended,
            condition: model.condition,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<product_images::Model> for ProductImage {
    fn from(model: product_images::Model) -> Self {
        Self {
            id: model.id,
            image: model.image,
            product_id: model.product_id,
            is_active: model.is_active,
        }
    }
}

impl From<services::Model> for Service {
    fn from(model: services::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            image: model.image,
            description: model.description,
            is_active: model.is_active,
        }
    }
}
