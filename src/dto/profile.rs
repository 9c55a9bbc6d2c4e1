use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{models::User, services::profile_service::ProfileContext};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePage {
    pub user: User,
    #[serde(flatten)]
    pub context: ProfileContext,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileOrdersPage {
    pub order_count: u64,
    pub awaiting_delivery_count: u64,
    pub delivered_count: u64,
    pub recent_orders: Vec<crate::services::profile_service::RecentOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistPage {
    pub wishlist_count: u64,
}
