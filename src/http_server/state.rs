//! Shared handler state and the bearer-token extractor

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use super::errors::ApiError;
use crate::auth::{AuthError, JwtManager, Principal};
use crate::config::AppConfig;
use crate::email::{EmailSender, EmailService, TemplateManager};
use crate::observability::AuditLog;
use crate::users::{InMemoryUserRepository, UserService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
}

impl AppState {
    /// Wire a fresh in-memory store to the given mail transport and audit sink
    pub fn new(config: &AppConfig, sender: Arc<dyn EmailSender>, audit: Arc<dyn AuditLog>) -> Self {
        let emails = EmailService::new(sender, TemplateManager::new(), config.email.base_url.clone());
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            JwtManager::new(config.jwt.clone()),
            Arc::new(emails),
            audit,
            config.account_settings(),
        );

        Self {
            service: Arc::new(service),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The caller identified by a valid `Authorization: Bearer` token
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::AuthenticationRequired)?;
        let claims = state.service.jwt().validate_token(token)?;
        Ok(Self(Principal::from_claims(&claims)?))
    }
}
