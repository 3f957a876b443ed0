//! API error types and response mapping.
//!
//! Every handler error funnels through [`ApiError`], which controls the
//! HTTP status, the JSON error envelope, and what gets logged. Internal
//! details are logged but never sent to clients.

use std::fmt;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::StoreError;

/// Errors surfaced to API clients.
#[derive(Debug)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    BadRequest(String),
    /// Authentication is missing or invalid.
    Unauthorized(String),
    /// The authenticated user may not perform this operation.
    Forbidden,
    /// The requested resource does not exist.
    NotFound(String),
    /// The request conflicts with the current state of the resource.
    Conflict(String),
    /// The client has exceeded its request budget.
    RateLimited { retry_after_secs: u64 },
    /// An internal failure. The message is logged, not returned.
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad request: {msg}"),
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::RateLimited { retry_after_secs } => {
                write!(f, "rate limit exceeded, retry after {retry_after_secs}s")
            }
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the error envelope. Internal errors are
    /// replaced with a fixed message.
    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::Conflict(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Unauthorized(msg) => msg.clone(),
            Self::Forbidden => "forbidden".to_owned(),
            Self::RateLimited { retry_after_secs } => {
                format!("rate limit exceeded, retry after: {retry_after_secs}s")
            }
            Self::Internal(_) => "the server encountered a problem".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = Json(json!({ "error": self.client_message() }));
        let mut response = (status, body).into_response();
        if let Self::RateLimited { retry_after_secs } = self
            && let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound("resource not found".to_owned()),
            StoreError::DuplicateEmail => {
                Self::BadRequest("a user with that email already exists".to_owned())
            }
            StoreError::DuplicateUsername => {
                Self::BadRequest("a user with that username already exists".to_owned())
            }
            StoreError::AlreadyExists => Self::Conflict("resource already exists".to_owned()),
            StoreError::UpdateConflict => {
                Self::Conflict("the resource was modified concurrently".to_owned())
            }
            StoreError::Database(error) => Self::Internal(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::BadRequest(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_variants() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::RateLimited {
                retry_after_secs: 5
            }
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let error = ApiError::Internal("connection pool exhausted".into());
        assert_eq!(error.client_message(), "the server encountered a problem");
    }

    #[test]
    fn store_conflicts_map_to_conflict() {
        let error: ApiError = StoreError::UpdateConflict.into();
        assert!(matches!(error, ApiError::Conflict(_)));
    }

    #[test]
    fn duplicate_user_fields_are_bad_requests() {
        assert!(matches!(
            ApiError::from(StoreError::DuplicateEmail),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(StoreError::DuplicateUsername),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn rate_limited_sets_retry_after_header() {
        let response = ApiError::RateLimited {
            retry_after_secs: 3,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(RETRY_AFTER).map(|v| v.to_str().ok()),
            Some(Some("3"))
        );
    }
}
