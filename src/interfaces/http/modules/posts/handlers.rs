//! Post API handlers
//!
//! Thin wrappers over `PostStore` and `EngagementEngine`; every post that
//! leaves here goes through `ViewResolver`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CommentRequest, CreatePostRequest, FeedParams, SearchParams, UpdatePostRequest};
use crate::application::{CommentView, EngagementEngine, Identity, PostStore, PostView, ViewResolver};
use crate::domain::LikeToggle;
use crate::interfaces::http::common::{ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::error::ApiError;

#[derive(Clone)]
pub struct PostsState {
    pub store: Arc<PostStore>,
    pub engagement: Arc<EngagementEngine>,
    pub views: ViewResolver,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    params(FeedParams),
    responses(
        (status = 200, description = "Newest-first feed window", body = ApiResponse<Vec<PostView>>)
    )
)]
pub async fn list_posts(
    State(state): State<PostsState>,
    Query(params): Query<FeedParams>,
) -> ApiResult<Vec<PostView>> {
    let request = state
        .store
        .settings()
        .page_request(params.page.as_deref(), params.limit.as_deref());
    let page = state.store.list(request).await?;
    let views = state.views.posts(&page.items).await?;
    Ok(Json(ApiResponse::list(views).with_pagination(page.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/posts/search",
    tag = "Posts",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching posts, newest first", body = ApiResponse<Vec<PostView>>),
        (status = 400, description = "Empty query")
    )
)]
pub async fn search_posts(
    State(state): State<PostsState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<PostView>> {
    let posts = state
        .store
        .search_by_caption(params.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::list(state.views.posts(&posts).await?)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = ApiResponse<PostView>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_post(State(state): State<PostsState>, Path(id): Path<String>) -> ApiResult<PostView> {
    let post = state.store.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(state.views.post(&post).await?)))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostView>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_post(
    State(state): State<PostsState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostView>>), ApiError> {
    let post = state.store.create(identity.id(), request.into()).await?;
    let view = state.views.post(&post).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostView>),
        (status = 401, description = "Unauthorized or not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_post(
    State(state): State<PostsState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<PostView> {
    let post = state.store.update(&id, identity.id(), request.into()).await?;
    Ok(Json(ApiResponse::success(state.views.post(&post).await?)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = ApiResponse<EmptyData>),
        (status = 401, description = "Unauthorized or not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_post(
    State(state): State<PostsState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    state.store.delete(&id, identity.id()).await?;
    Ok(Json(ApiResponse::success(EmptyData::default())))
}

/// Flips the caller's like: a second call undoes the first.
#[utoipa::path(
    put,
    path = "/api/posts/{id}/like",
    tag = "Posts",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like toggled (flip, not idempotent)", body = ApiResponse<LikeToggle>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    )
)]
pub async fn toggle_like(
    State(state): State<PostsState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<LikeToggle> {
    let toggle = state.engagement.toggle_like(&id, identity.id()).await?;
    Ok(Json(ApiResponse::success(toggle)))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    tag = "Posts",
    security(("cookie_auth" = []), ("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment appended", body = ApiResponse<CommentView>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    )
)]
pub async fn add_comment(
    State(state): State<PostsState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentView>>), ApiError> {
    let comment = state
        .engagement
        .add_comment(&id, identity.id(), &request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))))
}
