//! Versioned JSON API.
//!
//! Everything under `/v1`. Responses are wrapped in a `{"data": ...}`
//! envelope; errors in `{"error": ...}` via [`ApiError`](crate::error::ApiError).

pub mod auth;
pub mod feed;
pub mod health;
pub mod middleware;
pub mod posts;
pub mod rate_limit;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use sandpiper_core::UserId;
use sandpiper_mail::Mailer;
use sandpiper_social::User;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::config::ServerConfig;
use crate::db::{
    CommentRepository, FollowerRepository, PostRepository, StoreError, UserCache, UserRepository,
};
use rate_limit::FixedWindowLimiter;
use sandpiper_auth::JwtAuthenticator;

/// Seconds before an in-flight request is abandoned.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Shared state for API handlers.
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub authenticator: Arc<JwtAuthenticator>,
    /// Optional user cache; absent when redis is disabled.
    pub user_cache: Option<UserCache>,
    pub rate_limiter: FixedWindowLimiter,
}

impl AppState {
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.pool.clone())
    }

    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.pool.clone())
    }

    pub fn followers(&self) -> FollowerRepository {
        FollowerRepository::new(self.pool.clone())
    }

    /// Looks up an active user, going through the cache when available.
    ///
    /// Cache failures are logged and fall through to the database, so a
    /// broken redis never takes profile lookups down.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        if let Some(cache) = &self.user_cache {
            match cache.get(id).await {
                Ok(Some(user)) => return Ok(Some(user)),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(%error, user_id = %id, "user cache lookup failed");
                }
            }
        }

        let user = self.users().find_by_id(id).await?;

        if let (Some(cache), Some(user)) = (&self.user_cache, &user)
            && let Err(error) = cache.set(user).await
        {
            tracing::warn!(%error, user_id = %id, "user cache store failed");
        }

        Ok(user)
    }
}

/// Wraps a payload in the `{"data": ...}` envelope.
pub fn json_data<T: Serialize>(status: StatusCode, payload: T) -> Response {
    (status, Json(json!({ "data": payload }))).into_response()
}

/// Builds the `/v1` router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .frontend_url
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(300));

    let authentication = Router::new()
        .route("/user", post(auth::register_user))
        .route("/token", post(auth::create_token));

    let user_routes = Router::new()
        .route("/activate/{token}", put(users::activate_user))
        .route("/feed", get(feed::user_feed))
        .route("/{user_id}", get(users::get_user))
        .route("/{user_id}/follow", put(users::follow_user))
        .route("/{user_id}/unfollow", put(users::unfollow_user));

    let post_routes = Router::new()
        .route("/", post(posts::create_post))
        .route(
            "/{post_id}",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/{post_id}/comments", post(posts::create_comment));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/authentication", authentication)
        .nest("/users", user_routes)
        .nest("/posts", post_routes)
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::enforce_rate_limit,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(cors)
        .with_state(state)
}
