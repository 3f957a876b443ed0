//! User domain type.
//!
//! Users are created inactive at registration and become active only
//! after confirming the activation token mailed to them. Inactive users
//! cannot authenticate and are invisible to profile lookups.

use crate::password::PasswordHash;
use crate::role::Role;
use chrono::{DateTime, Utc};
use sandpiper_core::UserId;
use serde::{Deserialize, Serialize};

/// A registered user of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal platform user ID.
    id: UserId,
    first_name: String,
    last_name: String,
    /// Unique handle shown on posts and comments.
    username: String,
    /// Unique email address; login credential and activation target.
    email: String,
    /// bcrypt hash of the password. Absent on records loaded by queries
    /// that do not need credential checks. Never serialized into API
    /// responses or the cache.
    #[serde(skip_serializing, default)]
    password: Option<PasswordHash>,
    /// False until the activation token is confirmed.
    is_active: bool,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, inactive user with the default role.
    #[must_use]
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        email: String,
        password: PasswordHash,
    ) -> Self {
        Self {
            id: UserId::new(),
            first_name,
            last_name,
            username,
            email,
            password: Some(password),
            is_active: false,
            role: Role::default(),
            created_at: Utc::now(),
        }
    }

    /// Creates a user with all fields specified.
    ///
    /// Use this when reconstituting a user from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments)]
    pub fn with_all_fields(
        id: UserId,
        first_name: String,
        last_name: String,
        username: String,
        email: String,
        password: Option<PasswordHash>,
        is_active: bool,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            username,
            email,
            password,
            is_active,
            role,
            created_at,
        }
    }

    /// Returns the user's internal platform ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the stored password hash, if loaded.
    #[must_use]
    pub fn password(&self) -> Option<&PasswordHash> {
        self.password.as_ref()
    }

    /// Returns whether the account has been activated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns when the user registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the account active. Called when the activation token is
    /// confirmed.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Assigns a new role.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "Ada".to_string(),
            "Lovelace".to_string(),
            "ada".to_string(),
            "ada@example.com".to_string(),
            PasswordHash::from_stored("$2b$12$stub".to_string()),
        )
    }

    #[test]
    fn new_user_is_inactive() {
        let user = sample_user();
        assert!(!user.is_active());
    }

    #[test]
    fn new_user_has_default_role() {
        let user = sample_user();
        assert_eq!(user.role(), Role::User);
    }

    #[test]
    fn new_user_has_generated_id() {
        let user = sample_user();
        assert!(user.id().to_string().starts_with("usr_"));
    }

    #[test]
    fn activate_marks_user_active() {
        let mut user = sample_user();
        user.activate();
        assert!(user.is_active());
    }

    #[test]
    fn set_role_updates_role() {
        let mut user = sample_user();
        user.set_role(Role::Moderator);
        assert_eq!(user.role(), Role::Moderator);
    }
}
