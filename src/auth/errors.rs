//! # Auth Errors
//!
//! Error types shared by authentication, account management and promotion.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication, authorization and account errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================

    /// Unknown email or wrong password (generic - don't leak which)
    #[error("Incorrect email or password.")]
    InvalidCredentials,

    /// Too many failed logins
    #[error("Account locked due to too many failed login attempts.")]
    AccountLocked,

    /// Email not verified yet
    #[error("Email not verified")]
    EmailNotVerified,

    /// Verification link does not match
    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    // ==================
    // Account Errors
    // ==================

    /// Email already registered
    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Nickname already taken
    #[error("Nickname already exists")]
    NicknameAlreadyExists,

    /// Password does not meet requirements
    #[error("{0}")]
    WeakPassword(String),

    /// Field failed validation
    #[error("{0}")]
    Validation(String),

    /// No account with the given id
    #[error("User not found")]
    UserNotFound,

    // ==================
    // Token Errors
    // ==================

    /// No bearer token supplied
    #[error("Not authenticated")]
    AuthenticationRequired,

    /// JWT token is malformed
    #[error("Could not validate credentials")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Could not validate credentials")]
    InvalidSignature,

    // ==================
    // Authorization Errors
    // ==================

    /// Caller's role does not permit the operation
    #[error("Operation not permitted")]
    Forbidden,

    // ==================
    // Internal Errors
    // ==================

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::AccountLocked => 400,
            AuthError::InvalidVerificationToken => 400,
            AuthError::EmailAlreadyExists => 400,
            AuthError::NicknameAlreadyExists => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::EmailNotVerified => 401,
            AuthError::AuthenticationRequired => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,

            // 403 Forbidden
            AuthError::Forbidden => 403,

            // 404 Not Found
            AuthError::UserNotFound => 404,

            // 422 Unprocessable Entity
            AuthError::WeakPassword(_) => 422,
            AuthError::Validation(_) => 422,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }

    /// Returns whether this error is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::AccountLocked.status_code(), 400);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::UserNotFound.status_code(), 404);
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), 400);
        assert_eq!(AuthError::WeakPassword("short".into()).status_code(), 422);
        assert_eq!(AuthError::HashingFailed.status_code(), 500);
    }

    #[test]
    fn test_error_messages_do_not_leak_info() {
        let err = AuthError::InvalidCredentials;
        assert_eq!(err.to_string(), "Incorrect email or password.");
        assert_eq!(
            AuthError::MalformedToken.to_string(),
            AuthError::InvalidSignature.to_string()
        );
    }

    #[test]
    fn test_storage_errors_are_server_side() {
        assert!(!AuthError::StorageError("lock poisoned".into()).is_client_error());
        assert!(AuthError::NicknameAlreadyExists.is_client_error());
    }
}
