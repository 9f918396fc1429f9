//! # User Model
//!
//! The account record plus the request and response shapes built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation::{
    normalize_email, validate_nickname, validate_text, validate_url, BIO_MAX_LEN, NAME_MAX_LEN,
};
use crate::auth::crypto::{generate_token, hash_token, token_matches};
use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::role::UserRole;

/// Account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Public display handle (unique)
    pub nickname: String,

    /// Email address, lowercase (unique)
    pub email: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,

    pub role: UserRole,

    /// Professional status; only ADMIN/MANAGER may set it
    pub is_professional: bool,

    /// When professional status last changed
    pub professional_status_updated_at: Option<DateTime<Utc>>,

    pub email_verified: bool,

    /// SHA-256 digest of the pending email verification token
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,

    pub is_locked: bool,
    pub failed_login_attempts: u32,
    pub last_login_at: Option<DateTime<Utc>>,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub hashed_password: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an account from an already-normalized email and a password hash
    pub fn new(email: String, nickname: String, hashed_password: String, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            nickname,
            email,
            first_name: None,
            last_name: None,
            bio: None,
            profile_picture_url: None,
            linkedin_profile_url: None,
            github_profile_url: None,
            role,
            is_professional: false,
            professional_status_updated_at: None,
            email_verified: false,
            verification_token: None,
            is_locked: false,
            failed_login_attempts: 0,
            last_login_at: None,
            hashed_password,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name used to greet the user in emails
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.nickname.clone(),
        }
    }

    /// Store a fresh verification token digest and return the raw token
    pub fn issue_verification_token(&mut self) -> String {
        let raw = generate_token();
        self.verification_token = Some(hash_token(&raw));
        self.updated_at = Utc::now();
        raw
    }

    /// Consume a verification token.
    ///
    /// On success the email is marked verified and an ANONYMOUS account is
    /// upgraded to AUTHENTICATED.
    pub fn verify_email(&mut self, raw_token: &str) -> AuthResult<()> {
        let matches = self
            .verification_token
            .as_deref()
            .is_some_and(|stored| token_matches(raw_token, stored));
        if !matches {
            return Err(AuthError::InvalidVerificationToken);
        }

        self.verification_token = None;
        self.email_verified = true;
        if self.role == UserRole::Anonymous {
            self.role = UserRole::Authenticated;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Count a failed login. Returns true if this attempt locked the account.
    pub fn record_failed_login(&mut self, max_attempts: u32) -> bool {
        self.failed_login_attempts = self.failed_login_attempts.saturating_add(1);
        self.updated_at = Utc::now();
        if !self.is_locked && self.failed_login_attempts >= max_attempts {
            self.is_locked = true;
            return true;
        }
        false
    }

    /// Reset the failure counter and stamp the login time
    pub fn record_successful_login(&mut self) {
        let now = Utc::now();
        self.failed_login_attempts = 0;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}

/// Profile fields any caller may supply; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileFields {
    #[serde(default)]
    #[schema(example = "john_doe_123")]
    pub nickname: Option<String>,
    #[serde(default)]
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[serde(default)]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    #[schema(example = "https://linkedin.com/in/johndoe")]
    pub linkedin_profile_url: Option<String>,
    #[serde(default)]
    #[schema(example = "https://github.com/johndoe")]
    pub github_profile_url: Option<String>,
}

impl ProfileFields {
    pub fn validate(&self) -> AuthResult<()> {
        if let Some(nickname) = &self.nickname {
            validate_nickname(nickname)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_text("first_name", first_name, NAME_MAX_LEN)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_text("last_name", last_name, NAME_MAX_LEN)?;
        }
        if let Some(bio) = &self.bio {
            validate_text("bio", bio, BIO_MAX_LEN)?;
        }
        for (field, value) in [
            ("profile_picture_url", &self.profile_picture_url),
            ("linkedin_profile_url", &self.linkedin_profile_url),
            ("github_profile_url", &self.github_profile_url),
        ] {
            if let Some(url) = value {
                validate_url(field, url)?;
            }
        }
        Ok(())
    }

    /// Copy every supplied field onto `user`. Nickname uniqueness is the
    /// caller's responsibility.
    pub fn apply_to(self, user: &mut User) {
        if let Some(nickname) = self.nickname {
            user.nickname = nickname;
        }
        if self.first_name.is_some() {
            user.first_name = self.first_name;
        }
        if self.last_name.is_some() {
            user.last_name = self.last_name;
        }
        if self.bio.is_some() {
            user.bio = self.bio;
        }
        if self.profile_picture_url.is_some() {
            user.profile_picture_url = self.profile_picture_url;
        }
        if self.linkedin_profile_url.is_some() {
            user.linkedin_profile_url = self.linkedin_profile_url;
        }
        if self.github_profile_url.is_some() {
            user.github_profile_url = self.github_profile_url;
        }
        user.updated_at = Utc::now();
    }
}

/// Public self-registration
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "Secure*1234")]
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

fn default_role() -> UserRole {
    UserRole::Authenticated
}

/// Account creation by an administrator
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

/// Administrative partial update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

/// Form body of `POST /login/`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    /// The account email
    pub username: String,
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    pub is_professional: bool,
    pub professional_status_updated_at: Option<DateTime<Utc>>,
    pub email_verified: bool,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            profile_picture_url: user.profile_picture_url,
            linkedin_profile_url: user.linkedin_profile_url,
            github_profile_url: user.github_profile_url,
            role: user.role,
            is_professional: user.is_professional,
            professional_status_updated_at: user.professional_status_updated_at,
            email_verified: user.email_verified,
            is_locked: user.is_locked,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl UserUpdate {
    pub fn validate(&mut self) -> AuthResult<()> {
        if let Some(email) = &self.email {
            self.email = Some(normalize_email(email)?);
        }
        self.profile.validate()
    }
}
