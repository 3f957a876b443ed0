//! Database repositories for the sandpiper API.
//!
//! This module provides data access for:
//! - Users, activation invitations, and followers
//! - Posts and their comments
//! - The redis-backed user cache

pub mod cache;
pub mod comments;
pub mod followers;
pub mod posts;
pub mod users;

use std::fmt;

pub use cache::UserCache;
pub use comments::CommentRepository;
pub use followers::FollowerRepository;
pub use posts::PostRepository;
pub use users::UserRepository;

/// Errors produced by the storage layer.
#[derive(Debug)]
pub enum StoreError {
    /// The requested row does not exist.
    NotFound,
    /// A user with that email already exists.
    DuplicateEmail,
    /// A user with that username already exists.
    DuplicateUsername,
    /// The row being inserted already exists.
    AlreadyExists,
    /// An optimistic-lock update found a stale version.
    UpdateConflict,
    /// Any other database failure.
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "row not found"),
            Self::DuplicateEmail => write!(f, "duplicate email"),
            Self::DuplicateUsername => write!(f, "duplicate username"),
            Self::AlreadyExists => write!(f, "row already exists"),
            Self::UpdateConflict => write!(f, "stale version on update"),
            Self::Database(error) => write!(f, "database error: {error}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(error) => Some(error),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) => match db.constraint() {
                Some("users_email_key") => Self::DuplicateEmail,
                Some("users_username_key") => Self::DuplicateUsername,
                Some("followers_pkey") => Self::AlreadyExists,
                _ => Self::Database(error),
            },
            _ => Self::Database(error),
        }
    }
}
