//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData, ErrorMessage};
use super::middleware::{auth_middleware, AuthState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::posts::{self, PostsState};
use super::modules::request_id::request_id_middleware;
use super::modules::users::{self, UsersState};
use crate::application::{
    AuthGate, CommentView, EngagementEngine, FeedSettings, PostStore, PostView, ProfileAggregator,
    ProfileStats, SellerProfile, UserDirectory, ViewResolver,
};
use crate::domain::{LikeToggle, PublicProfile, RepositoryProvider, UserSummary};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::SeaOrmRepositoryProvider;
use crate::shared::{PageLink, Pagination};

/// Everything the router needs, built once at startup
#[derive(Clone)]
pub struct ApiDependencies {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub feed: FeedSettings,
    pub cookie_name: String,
    /// `*` allows any origin without credentials
    pub allowed_origins: Vec<String>,
    pub metrics: Option<PrometheusHandle>,
}

impl ApiDependencies {
    /// SeaORM-backed repositories with default settings.
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig) -> Self {
        Self {
            repos: Arc::new(SeaOrmRepositoryProvider::new(db.clone())),
            db,
            jwt_config,
            feed: FeedSettings::default(),
            cookie_name: "token".into(),
            allowed_origins: vec!["http://localhost:4500".into()],
            metrics: None,
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        posts::list_posts,
        posts::search_posts,
        posts::get_post,
        posts::create_post,
        posts::update_post,
        posts::delete_post,
        posts::toggle_like,
        posts::add_comment,
        users::update_profile,
        users::get_seller_profile,
        users::search_users,
    ),
    components(
        schemas(
            ErrorMessage,
            EmptyData,
            Pagination,
            PageLink,
            PostView,
            CommentView,
            UserSummary,
            PublicProfile,
            LikeToggle,
            SellerProfile,
            ProfileStats,
            posts::CreatePostRequest,
            posts::UpdatePostRequest,
            posts::CommentRequest,
            users::UpdateProfileRequest,
            users::AccountDto,
            health::HealthResponse,
            health::DatabaseHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Posts", description = "Feed, search, post CRUD, likes and comments"),
        (name = "Users", description = "Profiles and user search"),
    ),
    info(
        title = "Bazaar Marketplace API",
        version = "1.0.0",
        description = "Media posts with captions and prices, likes, comments and seller profiles",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("Route not found")),
    )
}

/// Create the API router with all routes
pub fn create_api_router(deps: ApiDependencies) -> Router {
    let ApiDependencies {
        db,
        repos,
        jwt_config,
        feed,
        cookie_name,
        allowed_origins,
        metrics,
    } = deps;

    let auth_state = AuthState {
        gate: Arc::new(AuthGate::new(repos.clone(), jwt_config)),
        cookie_name: cookie_name.into(),
    };
    let auth = middleware::from_fn_with_state(auth_state, auth_middleware);

    let posts_state = PostsState {
        store: Arc::new(PostStore::new(repos.clone(), feed)),
        engagement: Arc::new(EngagementEngine::new(repos.clone())),
        views: ViewResolver::new(repos.clone()),
    };
    let users_state = UsersState {
        directory: Arc::new(UserDirectory::new(repos.clone(), feed.search_limit)),
        profiles: Arc::new(ProfileAggregator::new(repos)),
    };

    // Reads are public; each mutating method carries the auth layer.
    let post_routes = Router::new()
        .route(
            "/",
            get(posts::list_posts).merge(post(posts::create_post).route_layer(auth.clone())),
        )
        .route("/search", get(posts::search_posts))
        .route(
            "/{id}",
            get(posts::get_post).merge(
                put(posts::update_post)
                    .delete(posts::delete_post)
                    .route_layer(auth.clone()),
            ),
        )
        .route("/{id}/like", put(posts::toggle_like).route_layer(auth.clone()))
        .route(
            "/{id}/comments",
            post(posts::add_comment).route_layer(auth.clone()),
        )
        .with_state(posts_state);

    let user_routes = Router::new()
        .route("/profile", put(users::update_profile).route_layer(auth))
        .route("/search", get(users::search_users))
        .route("/{id}/profile", get(users::get_seller_profile))
        .with_state(users_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: metrics });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/posts", post_routes)
        .nest("/api/users", user_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors_layer(&allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
