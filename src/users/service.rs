//! # User Service
//!
//! Account workflows: registration, email verification, login with lockout,
//! administrative management, self-service profile edits and professional
//! promotion.
//!
//! Administrative operations take the calling [`Principal`] and check its
//! role before touching storage.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::model::{CreateUserRequest, ProfileFields, RegisterRequest, User, UserResponse, UserUpdate};
use super::nickname::generate_nickname;
use super::pagination::{PageParams, UserListResponse};
use super::promotion::{can_promote, promote, PromotionEvent, PromotionOutcome};
use super::repository::UserRepository;
use super::validation::normalize_email;
use crate::auth::crypto::{hash_password, verify_password, PasswordPolicy};
use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::jwt::{JwtManager, TokenResponse};
use crate::auth::principal::Principal;
use crate::auth::role::{UserRole, USER_ADMINISTRATORS};
use crate::email::EmailService;
use crate::observability::{record_audit, AuditAction, AuditLog, AuditOutcome, AuditRecord};

const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;
const NICKNAME_ATTEMPTS: usize = 10;
const USERS_PATH: &str = "/users/";

/// Account rules applied by the service
#[derive(Debug, Clone)]
pub struct AccountSettings {
    pub password_policy: PasswordPolicy,
    /// Consecutive failed logins that lock an account
    pub max_login_attempts: u32,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            password_policy: PasswordPolicy::default(),
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
        }
    }
}

/// Run Argon2 work on the blocking pool so async workers stay free
async fn run_blocking<T, F>(work: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "password task failed");
        AuthError::HashingFailed
    })?
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    jwt: JwtManager,
    emails: Arc<EmailService>,
    audit: Arc<dyn AuditLog>,
    settings: AccountSettings,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        jwt: JwtManager,
        emails: Arc<EmailService>,
        audit: Arc<dyn AuditLog>,
        settings: AccountSettings,
    ) -> Self {
        Self {
            repo,
            jwt,
            emails,
            audit,
            settings,
        }
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    fn find(&self, id: Uuid) -> AuthResult<User> {
        self.repo.find_by_id(id)?.ok_or(AuthError::UserNotFound)
    }

    /// Use the requested nickname if free, otherwise generate one
    fn resolve_nickname(&self, requested: Option<&str>) -> AuthResult<String> {
        if let Some(nickname) = requested {
            if self.repo.nickname_exists(nickname)? {
                return Err(AuthError::NicknameAlreadyExists);
            }
            return Ok(nickname.to_string());
        }

        for _ in 0..NICKNAME_ATTEMPTS {
            let candidate = generate_nickname();
            if !self.repo.nickname_exists(&candidate)? {
                return Ok(candidate);
            }
        }
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!("{}_{}", generate_nickname(), &suffix[..8]))
    }

    /// Validate a new account's fields and build it (not yet stored)
    async fn build_account(
        &self,
        email: &str,
        password: &str,
        mut profile: ProfileFields,
        role: UserRole,
    ) -> AuthResult<User> {
        let email = normalize_email(email)?;
        self.settings.password_policy.validate(password)?;
        profile.validate()?;

        if self.repo.email_exists(&email)? {
            return Err(AuthError::EmailAlreadyExists);
        }
        let nickname = self.resolve_nickname(profile.nickname.take().as_deref())?;

        let password = password.to_string();
        let hashed_password = run_blocking(move || hash_password(&password)).await?;

        let mut user = User::new(email, nickname, hashed_password, role);
        profile.apply_to(&mut user);
        Ok(user)
    }

    // ==================
    // Self-service
    // ==================

    /// Register a new account.
    ///
    /// The very first account becomes a verified ADMIN. Every later account
    /// starts ANONYMOUS and is sent a verification link.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        let user = self
            .build_account(&request.email, &request.password, request.profile, UserRole::Anonymous)
            .await?;

        let mut pending_token = None;
        let user = self.repo.create_with(user, &mut |user: &mut User, first_account: bool| {
            if first_account {
                user.role = UserRole::Admin;
                user.email_verified = true;
            } else {
                pending_token = Some(user.issue_verification_token());
            }
        })?;

        record_audit(
            self.audit.as_ref(),
            AuditRecord::new(AuditAction::UserRegistered, AuditOutcome::Success)
                .with_target(user.id)
                .with_detail(user.role.as_str()),
        );
        info!(user_id = %user.id, role = %user.role, "user registered");

        if let Some(token) = pending_token {
            if let Err(e) = self.emails.send_verification_email(&user, &token).await {
                warn!(user_id = %user.id, error = %e, "verification email not sent");
            }
        }

        Ok(user)
    }

    /// Complete email verification from the emailed link
    pub fn verify_email(&self, user_id: Uuid, token: &str) -> AuthResult<User> {
        let user = self
            .repo
            .modify(user_id, &mut |user: &mut User| user.verify_email(token))
            .map_err(|e| match e {
                AuthError::UserNotFound => AuthError::InvalidVerificationToken,
                other => other,
            })?;

        info!(user_id = %user.id, role = %user.role, "email verified");
        Ok(user)
    }

    /// Authenticate by email and password and issue an access token.
    ///
    /// The failure counter and lock flag are updated on the stored record, so
    /// parallel attempts all count.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenResponse> {
        let email = email.trim().to_lowercase();
        let user = self
            .repo
            .find_by_email(&email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.is_locked {
            return Err(AuthError::AccountLocked);
        }
        if !user.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let password = password.to_string();
        let hash = user.hashed_password.clone();
        let password_ok = run_blocking(move || verify_password(&password, &hash)).await?;
        let gone = |e: AuthError| match e {
            AuthError::UserNotFound => AuthError::InvalidCredentials,
            other => other,
        };

        if !password_ok {
            let max_attempts = self.settings.max_login_attempts;
            let mut locked_now = false;
            let user = self
                .repo
                .modify(user.id, &mut |stored: &mut User| {
                    locked_now = stored.record_failed_login(max_attempts);
                    Ok(())
                })
                .map_err(gone)?;

            if locked_now {
                warn!(user_id = %user.id, attempts = user.failed_login_attempts, "account locked");
                record_audit(
                    self.audit.as_ref(),
                    AuditRecord::new(AuditAction::AccountLocked, AuditOutcome::Success)
                        .with_target(user.id)
                        .with_detail(format!("{} failed attempts", user.failed_login_attempts)),
                );
            }
            return Err(AuthError::InvalidCredentials);
        }

        // A parallel attempt may have locked the account during verification
        let user = self
            .repo
            .modify(user.id, &mut |stored: &mut User| {
                if stored.is_locked {
                    return Err(AuthError::AccountLocked);
                }
                stored.record_successful_login();
                Ok(())
            })
            .map_err(gone)?;

        let access_token = self.jwt.generate_access_token(user.id, user.role)?;
        info!(user_id = %user.id, "login succeeded");
        Ok(TokenResponse::bearer(access_token))
    }

    /// Caller edits their own profile. Only the supplied fields are written.
    pub fn update_profile(&self, actor: &Principal, profile: ProfileFields) -> AuthResult<User> {
        profile.validate()?;
        self.repo.modify(actor.user_id, &mut |user: &mut User| {
            profile.clone().apply_to(user);
            Ok(())
        })
    }

    // ==================
    // Administration (ADMIN / MANAGER)
    // ==================

    /// Create an account with an explicit role; its email counts as verified
    pub async fn create_user(&self, actor: &Principal, request: CreateUserRequest) -> AuthResult<User> {
        actor.require_any(USER_ADMINISTRATORS)?;

        let mut user = self
            .build_account(&request.email, &request.password, request.profile, request.role)
            .await?;
        user.email_verified = true;
        self.repo.create(&user)?;

        record_audit(
            self.audit.as_ref(),
            AuditRecord::new(AuditAction::UserCreated, AuditOutcome::Success)
                .with_actor(actor.user_id, actor.role.as_str())
                .with_target(user.id),
        );
        info!(user_id = %user.id, created_by = %actor.user_id, "user created");
        Ok(user)
    }

    pub fn get_user(&self, actor: &Principal, id: Uuid) -> AuthResult<User> {
        actor.require_any(USER_ADMINISTRATORS)?;
        self.find(id)
    }

    pub fn list_users(&self, actor: &Principal, params: PageParams) -> AuthResult<UserListResponse> {
        actor.require_any(USER_ADMINISTRATORS)?;
        let params = params.normalized()?;

        let total = self.repo.count()?;
        let items = self
            .repo
            .list(params.skip, params.limit)?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        Ok(UserListResponse::new(items, total, params, USERS_PATH))
    }

    /// Patch the supplied fields onto the stored account
    pub fn update_user(&self, actor: &Principal, id: Uuid, mut update: UserUpdate) -> AuthResult<User> {
        actor.require_any(USER_ADMINISTRATORS)?;
        update.validate()?;

        let UserUpdate { email, role, profile } = update;
        let user = self.repo.modify(id, &mut |user: &mut User| {
            if let Some(email) = &email {
                user.email = email.clone();
            }
            if let Some(role) = role {
                user.role = role;
            }
            profile.clone().apply_to(user);
            Ok(())
        })?;

        record_audit(
            self.audit.as_ref(),
            AuditRecord::new(AuditAction::UserUpdated, AuditOutcome::Success)
                .with_actor(actor.user_id, actor.role.as_str())
                .with_target(user.id),
        );
        Ok(user)
    }

    pub fn delete_user(&self, actor: &Principal, id: Uuid) -> AuthResult<()> {
        actor.require_any(USER_ADMINISTRATORS)?;
        self.repo.delete(id)?;

        record_audit(
            self.audit.as_ref(),
            AuditRecord::new(AuditAction::UserDeleted, AuditOutcome::Success)
                .with_actor(actor.user_id, actor.role.as_str())
                .with_target(id),
        );
        info!(user_id = %id, deleted_by = %actor.user_id, "user deleted");
        Ok(())
    }

    /// Grant professional status and notify the user.
    ///
    /// Rejected callers leave the target untouched. Re-promoting an
    /// already-professional user changes nothing and sends no email.
    pub async fn promote_user(&self, actor: &Principal, id: Uuid) -> AuthResult<User> {
        if !can_promote(actor.role) {
            record_audit(
                self.audit.as_ref(),
                AuditRecord::new(AuditAction::PromotionDenied, AuditOutcome::Rejected)
                    .with_actor(actor.user_id, actor.role.as_str())
                    .with_target(id),
            );
            warn!(actor = %actor.user_id, role = %actor.role, target = %id, "promotion denied");
            return Err(AuthError::Forbidden);
        }

        let mut outcome = None;
        let user = self.repo.modify(id, &mut |user: &mut User| {
            outcome = Some(promote(actor.role, user)?);
            Ok(())
        })?;

        let Some(event) = outcome.as_ref().and_then(PromotionOutcome::event) else {
            record_audit(
                self.audit.as_ref(),
                AuditRecord::new(AuditAction::PromotionGranted, AuditOutcome::Noop)
                    .with_actor(actor.user_id, actor.role.as_str())
                    .with_target(id)
                    .with_detail("already professional"),
            );
            return Ok(user);
        };

        record_audit(
            self.audit.as_ref(),
            AuditRecord::new(AuditAction::PromotionGranted, AuditOutcome::Success)
                .with_actor(actor.user_id, actor.role.as_str())
                .with_target(id),
        );
        info!(user_id = %id, promoted_by = %actor.user_id, "user promoted to professional");

        self.notify_promotion(event, &user.display_name()).await;
        Ok(user)
    }

    async fn notify_promotion(&self, event: &PromotionEvent, name: &str) {
        if let Err(e) = self.emails.send_pro_promotion_email(&event.email, name).await {
            warn!(user_id = %event.user_id, error = %e, "promotion email not sent");
        }
    }
}
