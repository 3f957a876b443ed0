//! Authentication extractor and rate limiting middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use sandpiper_social::User;

use super::AppState;
use super::rate_limit::Decision;
use crate::error::ApiError;

/// Extractor for requiring a bearer-token authenticated user.
pub struct RequireAuth(pub User);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("authorization header is missing".to_owned()))?;

        let token = parse_bearer(header)
            .ok_or_else(|| ApiError::Unauthorized("authorization header is malformed".to_owned()))?;

        let claims = app_state
            .authenticator
            .validate_token(token)
            .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_owned()))?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_owned()))?;

        let user = app_state.get_user(user_id).await.map_err(ApiError::from)?;

        Ok(RequireAuth(resolve_subject(user)?))
    }
}

/// Maps the subject lookup result: a token may validate while its user
/// no longer exists (or was never activated), which is a 404, not a
/// credential failure.
fn resolve_subject(user: Option<User>) -> Result<User, ApiError> {
    user.ok_or_else(|| ApiError::NotFound("user not found".to_owned()))
}

/// Extracts the token from a `Bearer <token>` header value.
fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Middleware enforcing the per-client fixed-window rate limit.
///
/// Keys on the peer address recorded by the listener.
pub async fn enforce_rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned());

    match state.rate_limiter.check_and_increment(&key) {
        Decision::Allowed { .. } => Ok(next.run(request).await),
        Decision::Exceeded { retry_after_secs } => Err(ApiError::RateLimited { retry_after_secs }),
    }
}
