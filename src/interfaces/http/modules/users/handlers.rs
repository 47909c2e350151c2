//! User API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::dto::{AccountDto, UpdateProfileRequest};
use crate::application::{Identity, ProfileAggregator, SellerProfile, UserDirectory};
use crate::domain::PublicProfile;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::modules::posts::SearchParams;

#[derive(Clone)]
pub struct UsersState {
    pub directory: Arc<UserDirectory>,
    pub profiles: Arc<ProfileAggregator>,
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<AccountDto>),
        (status = 400, description = "Validation error or user name taken"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    State(state): State<UsersState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let user = state
        .directory
        .update_profile(&identity, request.into())
        .await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/profile",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Seller profile with posts and totals", body = ApiResponse<SellerProfile>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_seller_profile(
    State(state): State<UsersState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SellerProfile>>, ApiError> {
    let profile = state.profiles.get_seller_profile(&id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "Users",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users", body = ApiResponse<Vec<PublicProfile>>),
        (status = 400, description = "Empty query")
    )
)]
pub async fn search_users(
    State(state): State<UsersState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<PublicProfile>>>, ApiError> {
    let users = state
        .directory
        .search_users(params.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::list(users)))
}
