//! Registration and token endpoints.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use chrono::Duration;
use sandpiper_mail::WelcomeEmail;
use sandpiper_social::{ActivationToken, PasswordHash, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AppState, json_data};
use crate::error::ApiError;

/// Payload for `POST /v1/authentication/user`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, max = 15))]
    pub first_name: String,
    #[validate(length(min = 1, max = 15))]
    pub last_name: String,
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    /// bcrypt truncates past 72 bytes, so cap the input there.
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

/// Registration response: the new user plus the plaintext activation
/// token. The token is shown exactly once.
#[derive(Debug, Serialize)]
struct UserWithToken<'a> {
    #[serde(flatten)]
    user: &'a User,
    token: &'a str,
}

/// `POST /v1/authentication/user`.
///
/// Creates an inactive user and its activation invitation, then mails
/// the activation link. If the mail cannot be delivered the freshly
/// created user is removed again, so a retry of the registration is
/// clean.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let password = PasswordHash::generate(&payload.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = User::new(
        payload.first_name,
        payload.last_name,
        payload.username,
        payload.email,
        password,
    );

    let token = ActivationToken::generate();
    let expires_in = Duration::minutes(state.config.mail.invitation_exp_minutes);

    state
        .users()
        .create_and_invite(&user, &token, expires_in)
        .await?;

    let email = WelcomeEmail {
        username: user.username().to_owned(),
        activation_url: format!(
            "{}/confirm/{}",
            state.config.frontend_url,
            token.plaintext()
        ),
    };

    if let Err(error) = state
        .mailer
        .send_welcome(user.email(), &email, !state.config.is_production())
        .await
    {
        tracing::error!(%error, user_id = %user.id(), "welcome email failed, rolling back registration");
        if let Err(rollback) = state.users().delete(user.id()).await {
            tracing::error!(%rollback, user_id = %user.id(), "registration rollback failed");
        }
        return Err(ApiError::Internal(error.to_string()));
    }

    tracing::info!(user_id = %user.id(), "user registered");
    Ok(json_data(
        StatusCode::CREATED,
        UserWithToken {
            user: &user,
            token: token.plaintext(),
        },
    ))
}

/// Payload for `POST /v1/authentication/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTokenPayload {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

/// `POST /v1/authentication/token`.
///
/// Verifies credentials against an active user and issues a signed
/// token. The failure message never says which part was wrong.
pub async fn create_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTokenPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let invalid = || ApiError::Unauthorized("invalid email or password".to_owned());

    let user = state
        .users()
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;

    let hash = user.password().ok_or_else(invalid)?;
    let verified = hash
        .verify(&payload.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !verified {
        return Err(invalid());
    }

    let token = state
        .authenticator
        .generate_token(user.id())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(json_data(StatusCode::CREATED, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegisterUserPayload {
        RegisterUserPayload {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "correct horse battery".to_owned(),
        }
    }

    #[test]
    fn valid_payload_passes_validation() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut payload = valid_registration();
        payload.email = "not-an-email".to_owned();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut payload = valid_registration();
        payload.password = "short".to_owned();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn long_first_name_is_rejected() {
        let mut payload = valid_registration();
        payload.first_name = "a".repeat(16);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn token_payload_requires_email() {
        let payload = CreateTokenPayload {
            email: "nope".to_owned(),
            password: "correct horse battery".to_owned(),
        };
        assert!(payload.validate().is_err());
    }
}
