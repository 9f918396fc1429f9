//! # Email Service
//!
//! Turns account events into rendered messages and hands them to a sender.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::errors::EmailResult;
use super::sender::{EmailSender, OutgoingEmail};
use super::templates::{EmailKind, TemplateManager};
use crate::users::model::User;

/// Per-recipient template data
#[derive(Debug, Clone)]
pub struct UserEmailData {
    pub email: String,
    pub name: String,
    pub verification_url: Option<String>,
}

pub struct EmailService {
    sender: Arc<dyn EmailSender>,
    templates: TemplateManager,
    base_url: String,
}

impl EmailService {
    pub fn new(sender: Arc<dyn EmailSender>, templates: TemplateManager, base_url: String) -> Self {
        Self {
            sender,
            templates,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Render `kind` for one user and send it
    pub async fn send_user_email(&self, data: &UserEmailData, kind: EmailKind) -> EmailResult<()> {
        let mut fields = HashMap::from([("name", data.name.clone())]);
        if let Some(url) = &data.verification_url {
            fields.insert("verification_url", url.clone());
        }

        let rendered = self.templates.render(kind, &fields)?;
        self.sender
            .send(&OutgoingEmail {
                to: data.email.clone(),
                subject: rendered.subject,
                body: rendered.body,
            })
            .await?;

        info!(template = %kind, to = %data.email, "email sent");
        Ok(())
    }

    /// Link that completes email verification
    pub fn verification_url(&self, user: &User, raw_token: &str) -> String {
        format!("{}/verify-email/{}/{}", self.base_url, user.id, raw_token)
    }

    pub async fn send_verification_email(&self, user: &User, raw_token: &str) -> EmailResult<()> {
        let data = UserEmailData {
            email: user.email.clone(),
            name: user.display_name(),
            verification_url: Some(self.verification_url(user, raw_token)),
        };
        self.send_user_email(&data, EmailKind::EmailVerification)
            .await
    }

    pub async fn send_pro_promotion_email(&self, email: &str, name: &str) -> EmailResult<()> {
        let data = UserEmailData {
            email: email.to_string(),
            name: name.to_string(),
            verification_url: None,
        };
        self.send_user_email(&data, EmailKind::ProPromotion).await
    }
}
