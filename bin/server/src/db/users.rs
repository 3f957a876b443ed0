//! Database repository for users and activation invitations.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sandpiper_core::UserId;
use sandpiper_social::{ActivationToken, PasswordHash, Role, User, hash_token};
use sqlx::{FromRow, PgPool};

use super::StoreError;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    password: Option<String>,
    is_active: bool,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, sqlx::Error> {
        let id = UserId::from_str(&self.id).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid user id '{}': {}", self.id, e),
            )))
        })?;
        let role = Role::from_str(&self.role).map_err(|e| {
            sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid role '{}': {}", self.role, e),
            )))
        })?;

        Ok(User::with_all_fields(
            id,
            self.first_name,
            self.last_name,
            self.username,
            self.email,
            self.password.map(PasswordHash::from_stored),
            self.is_active,
            role,
            self.created_at,
        ))
    }
}

/// Repository for user operations.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a user together with its activation invitation, in one
    /// transaction. The invitation stores only the token hash.
    pub async fn create_and_invite(
        &self,
        user: &User,
        token: &ActivationToken,
        expires_in: Duration,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users
                (id, first_name, last_name, username, email, password, is_active, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password().map(|p| p.as_str().to_owned()))
        .bind(user.is_active())
        .bind(user.role().as_str())
        .bind(user.created_at())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_invitations (token, user_id, expiry)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.hash())
        .bind(user.id().to_string())
        .bind(Utc::now() + expires_in)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Finds an active user by ID. Does not load the password hash.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, username, email,
                   NULL::text AS password, is_active, role, created_at
            FROM users
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_user()?)),
            None => Ok(None),
        }
    }

    /// Finds an active user by email, with the password hash loaded for
    /// credential verification.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, username, email,
                   password, is_active, role, created_at
            FROM users
            WHERE email = $1 AND is_active = true
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into_user()?)),
            None => Ok(None),
        }
    }

    /// Activates the user holding an unexpired invitation for the given
    /// plaintext token. Consumes all of the user's invitations.
    ///
    /// Returns [`StoreError::NotFound`] if no matching unexpired
    /// invitation exists.
    pub async fn activate(&self, plaintext_token: &str) -> Result<(), StoreError> {
        let token_hash = hash_token(plaintext_token);
        let mut tx = self.pool.begin().await?;

        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.username, u.email,
                   NULL::text AS password, u.is_active, u.role, u.created_at
            FROM users u
            JOIN user_invitations i ON i.user_id = u.id
            WHERE i.token = $1 AND i.expiry > $2
            "#,
        )
        .bind(&token_hash)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let user = row.ok_or(StoreError::NotFound)?.try_into_user()?;

        sqlx::query("UPDATE users SET is_active = true WHERE id = $1")
            .bind(user.id().to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM user_invitations WHERE user_id = $1")
            .bind(user.id().to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a user and its invitations. Used to roll back a
    /// registration whose welcome email could not be delivered.
    pub async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_invitations WHERE user_id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_bad_id_fails_decode() {
        let row = UserRow {
            id: "not-a-ulid".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: None,
            is_active: true,
            role: "user".to_owned(),
            created_at: Utc::now(),
        };
        assert!(row.try_into_user().is_err());
    }

    #[test]
    fn row_with_bad_role_fails_decode() {
        let row = UserRow {
            id: UserId::new().to_string(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: None,
            is_active: true,
            role: "superuser".to_owned(),
            created_at: Utc::now(),
        };
        assert!(row.try_into_user().is_err());
    }
}
