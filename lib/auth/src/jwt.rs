//! HMAC-signed JWT issuing and validation.

use crate::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sandpiper_core::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user ID the token was issued to.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Not-before, seconds since the epoch.
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    /// Parses the subject claim as a [`UserId`].
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        UserId::from_str(&self.sub).map_err(|_| AuthError::InvalidSubject {
            subject: self.sub.clone(),
        })
    }
}

/// Issues and validates HS256-signed access tokens.
///
/// The issuer string doubles as the audience, matching how the tokens
/// are consumed: only this platform ever validates them.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_lifetime: Duration,
}

impl JwtAuthenticator {
    /// Creates an authenticator from the shared secret.
    #[must_use]
    pub fn new(secret: &str, issuer: String, token_lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_lifetime,
        }
    }

    /// Issues a token for `user_id`, valid from now until the
    /// configured lifetime elapses.
    pub fn generate_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_lifetime).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            iss: self.issuer.clone(),
            aud: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AuthError::TokenCreation {
                reason: e.to_string(),
            }
        })
    }

    /// Validates a token's signature, expiry, not-before, issuer and
    /// audience, returning its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.issuer]);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken {
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new("test-secret", "sandpiper".to_string(), Duration::hours(24))
    }

    #[test]
    fn token_round_trips() {
        let auth = authenticator();
        let user_id = UserId::new();

        let token = auth.generate_token(user_id).expect("should sign");
        let claims = auth.validate_token(&token).expect("should validate");

        assert_eq!(claims.user_id().expect("valid subject"), user_id);
        assert_eq!(claims.iss, "sandpiper");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let auth = authenticator();
        let other = JwtAuthenticator::new("other-secret", "sandpiper".to_string(), Duration::hours(24));

        let token = auth.generate_token(UserId::new()).expect("should sign");
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let auth = authenticator();
        let other = JwtAuthenticator::new("test-secret", "elsewhere".to_string(), Duration::hours(24));

        let token = auth.generate_token(UserId::new()).expect("should sign");
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = JwtAuthenticator::new(
            "test-secret",
            "sandpiper".to_string(),
            Duration::seconds(-120),
        );

        let token = auth.generate_token(UserId::new()).expect("should sign");
        assert!(auth.validate_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = authenticator();
        assert!(auth.validate_token("not.a.jwt").is_err());
    }

    #[test]
    fn tampered_subject_is_not_a_user_id() {
        let claims = Claims {
            sub: "definitely-not-an-id".to_string(),
            exp: 0,
            iat: 0,
            nbf: 0,
            iss: "sandpiper".to_string(),
            aud: "sandpiper".to_string(),
        };
        assert!(claims.user_id().is_err());
    }
}
