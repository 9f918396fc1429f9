//! # Auth Module
//!
//! Password hashing, JWT access tokens, roles and permission checks.

pub mod crypto;
pub mod errors;
pub mod jwt;
pub mod principal;
pub mod role;

pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager, TokenResponse};
pub use principal::Principal;
pub use role::{require_role, UserRole, USER_ADMINISTRATORS};
