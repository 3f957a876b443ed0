//! Error types for the social domain crate.

use std::fmt;

/// Errors from password hashing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Hashing the plaintext password failed.
    HashFailed { reason: String },
    /// The stored hash could not be verified against.
    VerifyFailed { reason: String },
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashFailed { reason } => {
                write!(f, "password hashing failed: {reason}")
            }
            Self::VerifyFailed { reason } => {
                write!(f, "password verification failed: {reason}")
            }
        }
    }
}

impl std::error::Error for PasswordError {}

/// Errors from validating feed query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQueryError {
    /// Limit is outside the accepted range.
    InvalidLimit { limit: i64 },
    /// Offset is negative.
    InvalidOffset { offset: i64 },
    /// Sort order is not `asc` or `desc`.
    InvalidSort { sort: String },
    /// Too many tags, or a tag is outside the accepted length.
    InvalidTags { reason: String },
}

impl fmt::Display for FeedQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLimit { limit } => {
                write!(f, "limit must be between 1 and 100, got {limit}")
            }
            Self::InvalidOffset { offset } => {
                write!(f, "offset must not be negative, got {offset}")
            }
            Self::InvalidSort { sort } => {
                write!(f, "sort must be 'asc' or 'desc', got '{sort}'")
            }
            Self::InvalidTags { reason } => {
                write!(f, "invalid tags filter: {reason}")
            }
        }
    }
}

impl std::error::Error for FeedQueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_error_display() {
        let err = PasswordError::HashFailed {
            reason: "cost out of range".to_string(),
        };
        assert!(err.to_string().contains("password hashing failed"));
        assert!(err.to_string().contains("cost out of range"));
    }

    #[test]
    fn feed_query_error_display() {
        let err = FeedQueryError::InvalidLimit { limit: 500 };
        assert!(err.to_string().contains("500"));
    }
}
