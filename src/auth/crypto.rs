//! # Cryptographic Utilities
//!
//! Password hashing and verification-token handling.
//!
//! ## Invariants
//! - Passwords are only stored as Argon2id hashes
//! - Verification tokens are only stored as SHA-256 digests
//! - Secret comparisons are constant-time

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};

/// Password requirements configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_number: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    /// Validate a password against this policy
    pub fn validate(&self, password: &str) -> AuthResult<()> {
        validate_password(password, self)
    }
}

/// Validate password against policy
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> AuthResult<()> {
    if password.chars().count() < policy.min_length {
        return Err(AuthError::WeakPassword(format!(
            "String should have at least {} characters",
            policy.min_length
        )));
    }

    if policy.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if policy.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if policy.require_number && !password.chars().any(|c| c.is_numeric()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one number".to_string(),
        ));
    }

    if policy.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one special character".to_string(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::HashingFailed)
}

/// Verify a password against its hash
///
/// Uses constant-time comparison internally (via argon2 crate).
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a 256-bit random token, URL-safe base64 encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

/// Hash a token for storage using SHA-256
///
/// The raw token only ever leaves the process inside the verification email.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, digest)
}

/// Check a raw token against a stored digest in constant time
pub fn token_matches(raw_token: &str, stored_hash: &str) -> bool {
    constant_time_eq(hash_token(raw_token).as_bytes(), stored_hash.as_bytes())
}

/// Constant-time comparison of two byte slices
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = "MySuperPassword$1234";
        let hash = hash_password(password).unwrap();

        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_password_hash_is_salted() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same_password", &hash1).unwrap());
        assert!(verify_password("same_password", &hash2).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_rejected() {
        assert_eq!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_default_policy_reports_min_length() {
        let err = PasswordPolicy::default().validate("abc234").unwrap_err();
        assert_eq!(
            err.to_string(),
            "String should have at least 8 characters"
        );
        assert!(PasswordPolicy::default().validate("abcd2345").is_ok());
    }

    #[test]
    fn test_strict_policy() {
        let policy = PasswordPolicy {
            require_uppercase: true,
            require_number: true,
            require_special: true,
            ..Default::default()
        };

        assert!(validate_password("abcdefgh1!", &policy).is_err());
        assert!(validate_password("Abcdefgh!", &policy).is_err());
        assert!(validate_password("Abcdefgh1", &policy).is_err());
        assert!(validate_password("Abcdefgh1!", &policy).is_ok());
    }

    #[test]
    fn test_token_round_trip_through_digest() {
        let token = generate_token();
        let stored = hash_token(&token);

        assert_ne!(token, stored);
        assert!(token_matches(&token, &stored));
        assert!(!token_matches(&generate_token(), &stored));
    }

    #[test]
    fn test_constant_time_comparison() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hello!"));
    }
}
