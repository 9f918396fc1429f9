//! The authenticated caller of an operation.

use uuid::Uuid;

use super::errors::AuthResult;
use super::jwt::JwtClaims;
use super::role::{require_role, UserRole};

/// Who is acting, as established by a validated access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Principal {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Build from validated claims
    pub fn from_claims(claims: &JwtClaims) -> AuthResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            role: claims.role,
        })
    }

    /// Fail with `Forbidden` unless the caller holds one of `allowed`
    pub fn require_any(&self, allowed: &[UserRole]) -> AuthResult<()> {
        require_role(self.role, allowed)
    }
}
