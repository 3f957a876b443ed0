//! Database repository for the follower relation.

use sandpiper_core::UserId;
use sqlx::PgPool;

use super::StoreError;

/// Repository for follow and unfollow operations.
pub struct FollowerRepository {
    pool: PgPool,
}

impl FollowerRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records that `follower_id` follows `user_id`.
    ///
    /// Returns [`StoreError::AlreadyExists`] if the relation is already
    /// present.
    pub async fn follow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO followers (user_id, follower_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id.to_string())
        .bind(follower_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes the relation that `follower_id` follows `user_id`.
    /// Removing an absent relation is not an error.
    pub async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM followers
            WHERE user_id = $1 AND follower_id = $2
            "#,
        )
        .bind(user_id.to_string())
        .bind(follower_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
