//! Database repository for posts and the follower feed.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sandpiper_core::{PostId, UserId};
use sandpiper_social::{FeedPost, FeedQuery, Post};
use sqlx::{FromRow, PgPool};

use super::StoreError;

/// Row type for post queries.
#[derive(FromRow)]
struct PostRow {
    id: String,
    title: String,
    content: String,
    tags: Vec<String>,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i32,
}

impl PostRow {
    fn try_into_post(self) -> Result<Post, sqlx::Error> {
        let id = PostId::from_str(&self.id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid post id '{}': {}", self.id, e),
            )))
        })?;
        let user_id = UserId::from_str(&self.user_id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid user id '{}': {}", self.user_id, e),
            )))
        })?;

        Ok(Post::with_all_fields(
            id,
            self.title,
            self.content,
            self.tags,
            user_id,
            self.created_at,
            self.updated_at,
            self.version,
        ))
    }
}

/// Row type for feed queries: a post joined with its author's username
/// and comment count.
#[derive(FromRow)]
struct FeedRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_username: String,
    comment_count: i64,
}

impl FeedRow {
    fn try_into_feed_post(self) -> Result<FeedPost, sqlx::Error> {
        Ok(FeedPost {
            post: self.post.try_into_post()?,
            author_username: self.author_username,
            comment_count: self.comment_count,
        })
    }
}

/// Repository for post operations.
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new post.
    pub async fn create(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts
                (id, title, content, tags, user_id, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id().to_string())
        .bind(post.title())
        .bind(post.content())
        .bind(post.tags())
        .bind(post.user_id().to_string())
        .bind(post.created_at())
        .bind(post.updated_at())
        .bind(post.version())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds a post by ID.
    pub async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let row: Option<PostRow> = sqlx::query_as(
            r#"
            SELECT id, title, content, tags, user_id, created_at, updated_at, version
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_post()?)),
            None => Ok(None),
        }
    }

    /// Updates a post's title, content and tags under optimistic locking.
    ///
    /// Returns the new version on success, or
    /// [`StoreError::UpdateConflict`] if the stored version no longer
    /// matches `post.version()`.
    pub async fn update(&self, post: &Post) -> Result<i32, StoreError> {
        let new_version: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE posts
            SET title = $1, content = $2, tags = $3, updated_at = NOW(),
                version = version + 1
            WHERE id = $4 AND version = $5
            RETURNING version
            "#,
        )
        .bind(post.title())
        .bind(post.content())
        .bind(post.tags())
        .bind(post.id().to_string())
        .bind(post.version())
        .fetch_optional(&self.pool)
        .await?;

        match new_version {
            Some((version,)) => Ok(version),
            None => Err(StoreError::UpdateConflict),
        }
    }

    /// Deletes a post. Comments go with it via the foreign key cascade.
    pub async fn delete(&self, id: PostId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Returns the feed for `user_id`: posts by the users they follow,
    /// filtered and paginated per `query`.
    pub async fn user_feed(
        &self,
        user_id: UserId,
        query: &FeedQuery,
    ) -> Result<Vec<FeedPost>, StoreError> {
        // Sort order cannot be bound as a parameter; SortOrder::as_sql
        // only ever yields ASC or DESC.
        let sql = format!(
            r#"
            SELECT p.id, p.title, p.content, p.tags, p.user_id,
                   p.created_at, p.updated_at, p.version,
                   u.username AS author_username,
                   COUNT(c.id) AS comment_count
            FROM posts p
            JOIN users u ON u.id = p.user_id
            LEFT JOIN comments c ON c.post_id = p.id
            JOIN followers f ON f.user_id = p.user_id AND f.follower_id = $1
            WHERE (p.title ILIKE '%' || $2 || '%' OR p.content ILIKE '%' || $2 || '%')
              AND (p.tags @> $3 OR $3 = '{{}}')
            GROUP BY p.id, u.username
            ORDER BY p.created_at {}
            LIMIT $4 OFFSET $5
            "#,
            query.sort.as_sql(),
        );

        let rows: Vec<FeedRow> = sqlx::query_as(&sql)
            .bind(user_id.to_string())
            .bind(&query.search)
            .bind(&query.tags)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|r| r.try_into_feed_post().map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_bad_id_fails_decode() {
        let row = PostRow {
            id: "bogus".to_owned(),
            title: "t".to_owned(),
            content: "c".to_owned(),
            tags: vec![],
            user_id: UserId::new().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        };
        assert!(row.try_into_post().is_err());
    }
}
