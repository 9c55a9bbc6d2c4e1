use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Events written to `audit_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    UserLogout,
    ProfileUpdate,
    CategoryCreate,
    CategoryUpdate,
    CategoryDelete,
    ProductCategoryCreate,
    ProductCategoryDelete,
    CountryCreate,
    CountryDelete,
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    ProductImageCreate,
    ProductImageDelete,
    ServiceCreate,
    ServiceDelete,
    ActiveFlagChange,
    Upload,
}

impl AuditAction {
    pub fn action(self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::UserLogout => "user_logout",
            AuditAction::ProfileUpdate => "profile_update",
            AuditAction::CategoryCreate => "category_create",
            AuditAction::CategoryUpdate => "category_update",
            AuditAction::CategoryDelete => "category_delete",
            AuditAction::ProductCategoryCreate => "product_category_create",
            AuditAction::ProductCategoryDelete => "product_category_delete",
            AuditAction::CountryCreate => "country_create",
            AuditAction::CountryDelete => "country_delete",
            AuditAction::ProductCreate => "product_create",
            AuditAction::ProductUpdate => "product_update",
            AuditAction::ProductDelete => "product_delete",
            AuditAction::ProductImageCreate => "product_image_create",
            AuditAction::ProductImageDelete => "product_image_delete",
            AuditAction::ServiceCreate => "service_create",
            AuditAction::ServiceDelete => "service_delete",
            AuditAction::ActiveFlagChange => "active_flag_change",
            AuditAction::Upload => "upload",
        }
    }

    pub fn resource(self) -> &'static str {
        match self {
            AuditAction::UserRegister
            | AuditAction::UserLogin
            | AuditAction::UserLogout
            | AuditAction::ProfileUpdate => "users",
            AuditAction::CategoryCreate | AuditAction::CategoryUpdate | AuditAction::CategoryDelete => {
                "categories"
            }
            AuditAction::ProductCategoryCreate | AuditAction::ProductCategoryDelete => {
                "product_categories"
            }
            AuditAction::CountryCreate | AuditAction::CountryDelete => "countries",
            AuditAction::ProductCreate | AuditAction::ProductUpdate | AuditAction::ProductDelete => {
                "products"
            }
            AuditAction::ProductImageCreate | AuditAction::ProductImageDelete => "product_images",
            AuditAction::ServiceCreate | AuditAction::ServiceDelete => "services",
            AuditAction::ActiveFlagChange => "catalog",
            AuditAction::Upload => "uploads",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.action())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Like [`log_audit`] but never fails the caller.
pub async fn record_audit(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    if let Err(err) = log_audit(pool, user_id, action, Some(metadata)).await {
        tracing::warn!(error = %err, action = action.action(), "audit log failed");
    }
}
