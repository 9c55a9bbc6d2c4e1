use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use storefront_api::{
    entity::sea_orm_active_enums::UserRole,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_any_role},
    services::profile_service::{
        OrderSource, OrderSummary, ProfileContext, ProfileContextBuilder, RECENT_ORDERS_LIMIT,
        RecentOrder,
    },
};
use uuid::Uuid;

struct FixedOrders(OrderSummary);

#[async_trait]
impl OrderSource for FixedOrders {
    async fn summary(&self, _user_id: Uuid) -> AppResult<OrderSummary> {
        Ok(self.0.clone())
    }
}

struct BrokenOrders;

#[async_trait]
impl OrderSource for BrokenOrders {
    async fn summary(&self, _user_id: Uuid) -> AppResult<OrderSummary> {
        Err(AppError::Internal(anyhow::anyhow!("orders backend unavailable")))
    }
}

fn orders(count: i64) -> Vec<RecentOrder> {
    let now = Utc::now();
    (0..count)
        .map(|i| RecentOrder {
            id: Uuid::new_v4(),
            status: if i % 2 == 0 { "delivered" } else { "shipped" }.into(),
            total: Decimal::new(1000 + i, 2),
            created_at: now - Duration::days(i),
        })
        .collect()
}

#[tokio::test]
async fn no_source_yields_zero_aggregates() {
    let builder = ProfileContextBuilder::new(None);
    assert!(!builder.has_source());

    let context = builder.build(Uuid::new_v4()).await;
    assert_eq!(context, ProfileContext::default());
    assert_eq!(context.order_count, 0);
    assert_eq!(context.wishlist_count, 0);
    assert!(context.recent_orders.is_empty());
}

#[tokio::test]
async fn recent_orders_are_newest_first_and_capped() {
    let mut recent = orders(8);
    recent.reverse();
    let summary = OrderSummary {
        order_count: 8,
        wishlist_count: 3,
        awaiting_delivery_count: 4,
        delivered_count: 4,
        recent_orders: recent,
    };
    let builder = ProfileContextBuilder::new(Some(Arc::new(FixedOrders(summary))));
    assert!(builder.has_source());

    let context = builder.build(Uuid::new_v4()).await;
    assert_eq!(context.order_count, 8);
    assert_eq!(context.wishlist_count, 3);
    assert_eq!(context.awaiting_delivery_count, 4);
    assert_eq!(context.delivered_count, 4);
    assert_eq!(context.recent_orders.len(), RECENT_ORDERS_LIMIT);
    assert!(
        context
            .recent_orders
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
}

#[tokio::test]
async fn failing_source_degrades_to_empty_context() {
    let builder = ProfileContextBuilder::new(Some(Arc::new(BrokenOrders)));
    let context = builder.build(Uuid::new_v4()).await;
    assert_eq!(context, ProfileContext::default());
}

#[test]
fn seller_dashboard_roles() {
    let user = |role| AuthUser {
        user_id: Uuid::new_v4(),
        role,
    };
    let dashboard = [UserRole::Seller, UserRole::Admin];

    assert!(ensure_any_role(&user(UserRole::Seller), &dashboard).is_ok());
    assert!(ensure_any_role(&user(UserRole::Admin), &dashboard).is_ok());
    assert!(matches!(
        ensure_any_role(&user(UserRole::Customer), &dashboard),
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        ensure_admin(&user(UserRole::Seller)),
        Err(AppError::Forbidden)
    ));
}
