//! The closed set of user roles.
//!
//! Role names must match the CHECK constraint in the `users` migration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Role name stored in `users.role`.
pub const ROLE_USER: &str = "user";
/// Role name for moderators (may edit/delete any review or comment).
pub const ROLE_MODERATOR: &str = "moderator";
/// Role name for administrators.
pub const ROLE_ADMIN: &str = "admin";

/// A user's role tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    /// The database/wire representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Moderator => ROLE_MODERATOR,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_MODERATOR => Ok(Role::Moderator),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::validation(
                "role",
                format!("Unknown role '{other}'. Must be one of: user, moderator, admin"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_roundtrip_all_roles() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = Role::from_str("superadmin").unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Validation { field: "role", .. }
        ));
    }
}
