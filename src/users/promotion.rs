//! # Professional Promotion
//!
//! Permission check and state transition for granting professional status.
//!
//! ## Invariants
//! - Only ADMIN and MANAGER may promote; a rejected attempt mutates nothing
//! - The only transition is `is_professional: false -> true`
//! - A fresh promotion yields exactly one `PromotionEvent`; re-promoting an
//!   already-professional user yields none

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::User;
use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::role::UserRole;

/// Notification request produced by a fresh promotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionEvent {
    pub user_id: Uuid,
    pub email: String,
    pub nickname: String,
    pub promoted_by: UserRole,
    pub promoted_at: DateTime<Utc>,
}

/// Result of a permitted promotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// Flag flipped; notify the user
    Promoted(PromotionEvent),
    /// Flag was already set; nothing changed
    AlreadyProfessional,
}

impl PromotionOutcome {
    /// The notification to send, if any
    pub fn event(&self) -> Option<&PromotionEvent> {
        match self {
            PromotionOutcome::Promoted(event) => Some(event),
            PromotionOutcome::AlreadyProfessional => None,
        }
    }
}

/// Whether `actor` may set another user's professional status
pub fn can_promote(actor: UserRole) -> bool {
    actor.can_manage_users()
}

/// Grant professional status to `target` on behalf of `actor`
pub fn promote(actor: UserRole, target: &mut User) -> AuthResult<PromotionOutcome> {
    if !can_promote(actor) {
        return Err(AuthError::Forbidden);
    }

    if target.is_professional {
        return Ok(PromotionOutcome::AlreadyProfessional);
    }

    let now = Utc::now();
    target.is_professional = true;
    target.professional_status_updated_at = Some(now);
    target.updated_at = now;

    Ok(PromotionOutcome::Promoted(PromotionEvent {
        user_id: target.id,
        email: target.email.clone(),
        nickname: target.nickname.clone(),
        promoted_by: actor,
        promoted_at: now,
    }))
}
