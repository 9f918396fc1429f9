//! Field validation for account payloads.
//!
//! Every failure is an `AuthError::Validation` carrying a message meant for
//! the client.

use std::sync::OnceLock;

use regex::Regex;

use crate::auth::errors::{AuthError, AuthResult};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$";
const NICKNAME_PATTERN: &str = r"^[A-Za-z0-9_\-]+$";
const URL_PATTERN: &str = r"^https?://[^\s/$.?#][^\s]*$";

pub const NICKNAME_MIN_LEN: usize = 3;
pub const NICKNAME_MAX_LEN: usize = 50;
pub const NAME_MAX_LEN: usize = 100;
pub const BIO_MAX_LEN: usize = 500;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static NICKNAME_RE: OnceLock<Regex> = OnceLock::new();
static URL_RE: OnceLock<Regex> = OnceLock::new();

fn is_match(cell: &'static OnceLock<Regex>, pattern: &str, value: &str) -> AuthResult<bool> {
    if let Some(re) = cell.get() {
        return Ok(re.is_match(value));
    }
    let re = Regex::new(pattern)
        .map_err(|e| AuthError::StorageError(format!("invalid pattern {pattern}: {e}")))?;
    Ok(cell.get_or_init(|| re).is_match(value))
}

/// Validate and normalize an email address (trimmed, lowercase)
pub fn normalize_email(email: &str) -> AuthResult<String> {
    let email = email.trim().to_lowercase();
    if email.len() > 254 || !is_match(&EMAIL_RE, EMAIL_PATTERN, &email)? {
        return Err(AuthError::Validation(
            "value is not a valid email address".to_string(),
        ));
    }
    Ok(email)
}

/// Validate a nickname
pub fn validate_nickname(nickname: &str) -> AuthResult<()> {
    let len = nickname.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return Err(AuthError::Validation(format!(
            "nickname must be between {NICKNAME_MIN_LEN} and {NICKNAME_MAX_LEN} characters"
        )));
    }
    if !is_match(&NICKNAME_RE, NICKNAME_PATTERN, nickname)? {
        return Err(AuthError::Validation(
            "nickname may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

/// Validate an http(s) URL field
pub fn validate_url(field: &str, url: &str) -> AuthResult<()> {
    if !is_match(&URL_RE, URL_PATTERN, url)? {
        return Err(AuthError::Validation(format!(
            "{field} must be a valid http or https URL"
        )));
    }
    Ok(())
}

/// Validate free text against a maximum length
pub fn validate_text(field: &str, value: &str, max_len: usize) -> AuthResult<()> {
    if value.chars().count() > max_len {
        return Err(AuthError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}
