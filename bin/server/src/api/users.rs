//! User endpoints: activation, profiles, follow and unfollow.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use sandpiper_core::UserId;

use super::{AppState, json_data, middleware::RequireAuth};
use crate::db::StoreError;
use crate::error::ApiError;

/// `PUT /v1/users/activate/{token}`.
///
/// Consumes an unexpired activation invitation and marks the account
/// active. Unknown or expired tokens get a 404.
pub async fn activate_user(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.users().activate(&token).await {
        Ok(()) => {
            tracing::info!("user activated");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::NotFound) => Err(ApiError::NotFound("user not found".to_owned())),
        Err(error) => Err(error.into()),
    }
}

/// `GET /v1/users/{user_id}`. Requires authentication.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    RequireAuth(_viewer): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_user_id(&user_id)?;
    let user = state
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_owned()))?;

    Ok(json_data(StatusCode::OK, user))
}

/// `PUT /v1/users/{user_id}/follow`.
pub async fn follow_user(
    State(state): State<Arc<AppState>>,
    RequireAuth(follower): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target = parse_user_id(&user_id)?;
    if target == follower.id() {
        return Err(ApiError::BadRequest("you cannot follow yourself".to_owned()));
    }

    // The target must exist and be active.
    state
        .get_user(target)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_owned()))?;

    match state.followers().follow(target, follower.id()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::AlreadyExists) => Err(ApiError::Conflict(
            "you are already following this user".to_owned(),
        )),
        Err(error) => Err(error.into()),
    }
}

/// `PUT /v1/users/{user_id}/unfollow`.
pub async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    RequireAuth(follower): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target = parse_user_id(&user_id)?;
    if target == follower.id() {
        return Err(ApiError::BadRequest(
            "you cannot unfollow yourself".to_owned(),
        ));
    }

    state.followers().unfollow(target, follower.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_str(raw).map_err(|_| ApiError::BadRequest("invalid user id".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_user_id_is_a_bad_request() {
        assert!(matches!(
            parse_user_id("not-an-id"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn valid_user_id_parses() {
        let id = UserId::new();
        assert_eq!(parse_user_id(&id.to_string()).ok(), Some(id));
    }
}
