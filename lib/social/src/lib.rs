//! Domain model for the sandpiper social platform.
//!
//! This crate provides the core entities (users, posts, comments), the
//! role/precedence model, password storage, activation tokens, and feed
//! query validation. Persistence lives in the server crate; everything
//! here is storage-agnostic.

pub mod activation;
pub mod comment;
pub mod error;
pub mod feed;
pub mod password;
pub mod post;
pub mod role;
pub mod user;

pub use activation::{ActivationToken, hash_token};
pub use comment::{Comment, CommentAuthor, CommentWithAuthor};
pub use error::{FeedQueryError, PasswordError};
pub use feed::{FeedQuery, SortOrder};
pub use password::PasswordHash;
pub use post::{FeedPost, Post};
pub use role::Role;
pub use user::User;
