//! Error types for the auth crate.

use std::fmt;

/// Errors from token generation and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Signing a new token failed.
    TokenCreation { reason: String },
    /// The presented token did not validate (bad signature, expired,
    /// wrong issuer/audience, malformed).
    InvalidToken { reason: String },
    /// The subject claim is not a valid user ID.
    InvalidSubject { subject: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenCreation { reason } => {
                write!(f, "token creation failed: {reason}")
            }
            Self::InvalidToken { reason } => {
                write!(f, "invalid token: {reason}")
            }
            Self::InvalidSubject { subject } => {
                write!(f, "invalid token subject '{subject}'")
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        let err = AuthError::InvalidToken {
            reason: "signature mismatch".to_string(),
        };
        assert!(err.to_string().contains("invalid token"));
        assert!(err.to_string().contains("signature mismatch"));
    }
}
