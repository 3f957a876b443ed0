//! Post domain type.

use chrono::{DateTime, Utc};
use sandpiper_core::{PostId, UserId};
use serde::{Deserialize, Serialize};

/// A post authored by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    title: String,
    content: String,
    tags: Vec<String>,
    /// The author.
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Optimistic-locking version; bumped on every update.
    version: i32,
}

impl Post {
    /// Creates a new post at version 0.
    #[must_use]
    pub fn new(title: String, content: String, tags: Vec<String>, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            title,
            content,
            tags,
            user_id,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Creates a post with all fields specified.
    ///
    /// Use this when reconstituting a post from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: PostId,
        title: String,
        content: String,
        tags: Vec<String>,
        user_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: i32,
    ) -> Self {
        Self {
            id,
            title,
            content,
            tags,
            user_id,
            created_at,
            updated_at,
            version,
        }
    }

    #[must_use]
    pub fn id(&self) -> PostId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the author's ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-locking version.
    #[must_use]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns true if `user_id` is the author.
    #[must_use]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// Records the version returned by a successful optimistic update.
    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }
}

/// A post as it appears in a user's feed: the post plus the author's
/// username and the number of comments on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub post: Post,
    pub author_username: String,
    pub comment_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_starts_at_version_zero() {
        let post = Post::new(
            "title".to_string(),
            "content".to_string(),
            vec!["rust".to_string()],
            UserId::new(),
        );
        assert_eq!(post.version(), 0);
    }

    #[test]
    fn author_check() {
        let author = UserId::new();
        let post = Post::new("t".to_string(), "c".to_string(), vec![], author);
        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(UserId::new()));
    }
}
