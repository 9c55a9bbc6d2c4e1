use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::profile::{ProfileOrdersPage, ProfilePage, UpdateProfileRequest, WishlistPage},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/orders", get(profile_orders))
        .route("/wishlist", get(profile_wishlist))
        .route("/seller", get(seller_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile dashboard", body = ApiResponse<ProfilePage>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfilePage>>> {
    let resp = profile_service::get_profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile settings", body = ApiResponse<User>),
        (status = 400, description = "Username or email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = profile_service::update_profile(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/profile/orders",
    responses(
        (status = 200, description = "Order aggregates", body = ApiResponse<ProfileOrdersPage>)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn profile_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfileOrdersPage>>> {
    let resp = profile_service::profile_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/profile/wishlist",
    responses(
        (status = 200, description = "Wishlist aggregates", body = ApiResponse<WishlistPage>)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn profile_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WishlistPage>>> {
    let resp = profile_service::profile_wishlist(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/profile/seller",
    responses(
        (status = 200, description = "Seller dashboard", body = ApiResponse<ProfilePage>),
        (status = 403, description = "Not a seller")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn seller_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfilePage>>> {
    let resp = profile_service::seller_dashboard(&state, &user).await?;
    Ok(Json(resp))
}
