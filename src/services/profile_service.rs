use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, record_audit},
    dto::profile::{ProfileOrdersPage, ProfilePage, UpdateProfileRequest, WishlistPage},
    entity::{
        sea_orm_active_enums::UserRole,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const RECENT_ORDERS_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecentOrder {
    pub id: Uuid,
    pub status: String,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// What an order/wishlist backend reports for one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSummary {
    pub order_count: u64,
    pub wishlist_count: u64,
    pub awaiting_delivery_count: u64,
    pub delivered_count: u64,
    pub recent_orders: Vec<RecentOrder>,
}

#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn summary(&self, user_id: Uuid) -> AppResult<OrderSummary>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ProfileContext {
    pub order_count: u64,
    pub wishlist_count: u64,
    pub awaiting_delivery_count: u64,
    pub delivered_count: u64,
    pub recent_orders: Vec<RecentOrder>,
}

/// Builds dashboard aggregates. With no source configured, or when the
/// source fails, every aggregate is zero or empty.
#[derive(Clone, Default)]
pub struct ProfileContextBuilder {
    source: Option<Arc<dyn OrderSource>>,
}

impl ProfileContextBuilder {
    pub fn new(source: Option<Arc<dyn OrderSource>>) -> Self {
        Self { source }
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub async fn build(&self, user_id: Uuid) -> ProfileContext {
        let Some(source) = &self.source else {
            return ProfileContext::default();
        };
        match source.summary(user_id).await {
            Ok(summary) => {
                let mut recent_orders = summary.recent_orders;
                recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                recent_orders.truncate(RECENT_ORDERS_LIMIT);
                ProfileContext {
                    order_count: summary.order_count,
                    wishlist_count: summary.wishlist_count,
                    awaiting_delivery_count: summary.awaiting_delivery_count,
                    delivered_count: summary.delivered_count,
                    recent_orders,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, %user_id, "order source failed, using empty profile context");
                ProfileContext::default()
            }
        }
    }
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ProfilePage>> {
    let page = profile_page(state, user).await?;
    Ok(ApiResponse::success("Profile", page, Some(Meta::empty())))
}

pub async fn seller_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProfilePage>> {
    ensure_any_role(user, &[UserRole::Seller, UserRole::Admin])?;
    let page = profile_page(state, user).await?;
    Ok(ApiResponse::success("Seller profile", page, Some(Meta::empty())))
}

pub async fn profile_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProfileOrdersPage>> {
    let context = state.profile.build(user.user_id).await;
    let data = ProfileOrdersPage {
        order_count: context.order_count,
        awaiting_delivery_count: context.awaiting_delivery_count,
        delivered_count: context.delivered_count,
        recent_orders: context.recent_orders,
    };
    Ok(ApiResponse::success("Orders", data, Some(Meta::empty())))
}

pub async fn profile_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistPage>> {
    let context = state.profile.build(user.user_id).await;
    let data = WishlistPage {
        wishlist_count: context.wishlist_count,
    };
    Ok(ApiResponse::success("Wishlist", data, Some(Meta::empty())))
}

async fn profile_page(state: &AppState, user: &AuthUser) -> AppResult<ProfilePage> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let context = state.profile.build(user.user_id).await;
    Ok(ProfilePage {
        user: User::from(account),
        context,
    })
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(username) = payload.username.as_deref() {
        let taken = Users::find()
            .filter(UserCol::Username.eq(username))
            .filter(UserCol::Id.ne(user.user_id))
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("Username is already taken".into()));
        }
    }
    if let Some(email) = payload.email.as_deref() {
        let taken = Users::find()
            .filter(UserCol::Email.eq(email))
            .filter(UserCol::Id.ne(user.user_id))
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("Email is already taken".into()));
        }
    }

    let mut active: UserActive = existing.into();
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    let updated = active.update(&state.orm).await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProfileUpdate,
        serde_json::json!({ "user_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile updated",
        User::from(updated),
        Some(Meta::empty()),
    ))
}
