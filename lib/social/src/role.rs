//! Role and precedence types for platform access control.
//!
//! Every user carries exactly one role. Roles form a strict precedence
//! ladder: moderators may do everything users can, admins everything
//! moderators can. Resource-level checks (e.g. editing someone else's
//! post) compare the acting user's role level against the required level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role assigned to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard user with access to their own content.
    User,
    /// Moderator; may update other users' posts.
    Moderator,
    /// Administrator; may delete other users' posts.
    Admin,
}

impl Role {
    /// Returns the precedence level of this role.
    ///
    /// Higher levels imply all capabilities of lower ones.
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Self::User => 1,
            Self::Moderator => 2,
            Self::Admin => 3,
        }
    }

    /// Returns true if this role meets or exceeds `required`.
    #[must_use]
    pub fn satisfies(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the canonical lowercase name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The unrecognized role name.
    pub name: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.name)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(ParseRoleError {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn role_levels_are_ordered() {
        assert!(Role::User.level() < Role::Moderator.level());
        assert!(Role::Moderator.level() < Role::Admin.level());
    }

    #[test]
    fn admin_satisfies_all_roles() {
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::Admin.satisfies(Role::Moderator));
        assert!(Role::Admin.satisfies(Role::Admin));
    }

    #[test]
    fn user_does_not_satisfy_moderator() {
        assert!(!Role::User.satisfies(Role::Moderator));
        assert!(!Role::User.satisfies(Role::Admin));
    }

    #[test]
    fn moderator_satisfies_itself_and_user() {
        assert!(Role::Moderator.satisfies(Role::User));
        assert!(Role::Moderator.satisfies(Role::Moderator));
        assert!(!Role::Moderator.satisfies(Role::Admin));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            let parsed = Role::from_str(role.as_str()).expect("should parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn unknown_role_fails_to_parse() {
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Moderator.is_admin());
        assert!(!Role::User.is_admin());
    }
}
