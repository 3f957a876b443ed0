//! Database repository for comments.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sandpiper_core::{CommentId, PostId, UserId};
use sandpiper_social::{Comment, CommentAuthor, CommentWithAuthor};
use sqlx::{FromRow, PgPool};

use super::StoreError;

/// Row type for comment queries, joined with author fields.
#[derive(FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    user_id: String,
    content: String,
    created_at: DateTime<Utc>,
    author_first_name: String,
    author_last_name: String,
    author_username: String,
}

impl CommentRow {
    fn try_into_comment(self) -> Result<CommentWithAuthor, sqlx::Error> {
        let id = CommentId::from_str(&self.id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid comment id '{}': {}", self.id, e),
            )))
        })?;
        let post_id = PostId::from_str(&self.post_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid post id '{}': {}", self.post_id, e),
            )))
        })?;
        let user_id = UserId::from_str(&self.user_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid user id '{}': {}", self.user_id, e),
            )))
        })?;

        Ok(CommentWithAuthor {
            comment: Comment::with_all_fields(id, post_id, user_id, self.content, self.created_at),
            author: CommentAuthor {
                id: user_id,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
                username: self.author_username,
            },
        })
    }
}

/// Repository for comment operations.
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new comment.
    pub async fn create(&self, comment: &Comment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id().to_string())
        .bind(comment.post_id().to_string())
        .bind(comment.user_id().to_string())
        .bind(comment.content())
        .bind(comment.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists a post's comments, newest first, with author fields.
    pub async fn find_by_post_id(
        &self,
        post_id: PostId,
    ) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.post_id, c.user_id, c.content, c.created_at,
                   u.first_name AS author_first_name,
                   u.last_name AS author_last_name,
                   u.username AS author_username
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(post_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.try_into_comment().map_err(StoreError::from))
            .collect()
    }
}
