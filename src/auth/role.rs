//! # Roles
//!
//! The fixed set of account roles and the permission checks built on them.
//!
//! ## Invariants
//! - Only ADMIN and MANAGER may administer other accounts (including promotion)
//! - Role strings are the upper-case variant names on the wire and in tokens

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::{AuthError, AuthResult};

/// Roles allowed to administer other accounts
pub const USER_ADMINISTRATORS: &[UserRole] = &[UserRole::Admin, UserRole::Manager];

const ROLE_CHOICES: &str = "Input should be 'ANONYMOUS', 'AUTHENTICATED', 'MANAGER' or 'ADMIN'";

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum UserRole {
    /// Registered but email not yet verified
    Anonymous,
    /// Verified regular user
    Authenticated,
    /// Staff member with user administration rights
    Manager,
    /// Full administrator
    Admin,
}

impl UserRole {
    /// All roles, least to most privileged
    pub const ALL: [UserRole; 4] = [
        UserRole::Anonymous,
        UserRole::Authenticated,
        UserRole::Manager,
        UserRole::Admin,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Anonymous => "ANONYMOUS",
            UserRole::Authenticated => "AUTHENTICATED",
            UserRole::Manager => "MANAGER",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Whether this role is in `allowed`
    pub fn is_one_of(self, allowed: &[UserRole]) -> bool {
        allowed.contains(&self)
    }

    /// Whether this role may create, edit, delete, list and promote other users
    pub fn can_manage_users(self) -> bool {
        self.is_one_of(USER_ADMINISTRATORS)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthError::Validation(ROLE_CHOICES.to_string()))
    }
}

impl TryFrom<String> for UserRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|e: AuthError| e.to_string())
    }
}

/// Reject the call unless `actual` is one of `allowed`
pub fn require_role(actual: UserRole, allowed: &[UserRole]) -> AuthResult<()> {
    if actual.is_one_of(allowed) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_and_manager_manage_users() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(UserRole::Manager.can_manage_users());
        assert!(!UserRole::Authenticated.can_manage_users());
        assert!(!UserRole::Anonymous.can_manage_users());
    }

    #[test]
    fn test_wire_names_round_trip() {
        for role in UserRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: UserRole = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_unknown_role_lists_choices() {
        let err = serde_json::from_str::<UserRole>("\"INVALID_ROLE\"").unwrap_err();
        assert!(err.to_string().contains(ROLE_CHOICES));

        let err = "admin".parse::<UserRole>().unwrap_err();
        assert_eq!(err, AuthError::Validation(ROLE_CHOICES.to_string()));
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(UserRole::Manager, USER_ADMINISTRATORS).is_ok());
        assert_eq!(
            require_role(UserRole::Authenticated, USER_ADMINISTRATORS),
            Err(AuthError::Forbidden)
        );
    }
}
