//! Comment domain type.

use chrono::{DateTime, Utc};
use sandpiper_core::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    post_id: PostId,
    user_id: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment.
    #[must_use]
    pub fn new(post_id: PostId, user_id: UserId, content: String) -> Self {
        Self {
            id: CommentId::new(),
            post_id,
            user_id,
            content,
            created_at: Utc::now(),
        }
    }

    /// Creates a comment with all fields specified.
    ///
    /// Use this when reconstituting a comment from storage.
    #[must_use]
    pub fn with_all_fields(
        id: CommentId,
        post_id: PostId,
        user_id: UserId,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            user_id,
            content,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> CommentId {
        self.id
    }

    #[must_use]
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Public author fields attached to a comment in query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// A comment together with its author's public fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: CommentAuthor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_comment_has_generated_id() {
        let comment = Comment::new(PostId::new(), UserId::new(), "nice post".to_string());
        assert!(comment.id().to_string().starts_with("cmt_"));
        assert_eq!(comment.content(), "nice post");
    }
}
