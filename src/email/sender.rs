//! # Email Senders
//!
//! The transport seam: SMTP when enabled, a log-only sender when not, and an
//! in-memory recorder for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::errors::{EmailError, EmailResult};

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Send through SMTP; when false, messages are only logged
    pub enabled: bool,

    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username (empty for unauthenticated local relays)
    pub smtp_user: String,

    /// SMTP password (prefer the ROSTER_SMTP_PASSWORD environment variable)
    pub smtp_password: String,

    /// From email address
    pub from_email: String,

    /// From name
    pub from_name: String,

    /// Public base URL used to build links in emails
    pub base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@roster.local".to_string(),
            from_name: "Roster".to_string(),
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email sender trait for abstraction
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver one message
    async fn send(&self, email: &OutgoingEmail) -> EmailResult<()>;
}

/// Records messages instead of delivering them
#[derive(Debug, Default)]
pub struct MemoryEmailSender {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl MemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of messages sent so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EmailSender for MemoryEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> EmailResult<()> {
        self.sent
            .lock()
            .map_err(|_| EmailError::Transport("recorder lock poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}

/// Logs each message instead of delivering it. Nothing is retained.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> EmailResult<()> {
        info!(to = %email.to, subject = %email.subject, "email not delivered (SMTP disabled)");
        debug!(to = %email.to, body = %email.body, "undelivered email body");
        Ok(())
    }
}

/// SMTP email sender
pub struct SmtpEmailSender {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> EmailResult<Self> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("from address: {e}")))?;

        let mailer = if config.smtp_user.is_empty() {
            // No authentication (local development relays)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(config.smtp_user.clone(), config.smtp_password.clone());

            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| EmailError::Transport(format!("SMTP relay error: {e}")))?
                .credentials(creds)
                .port(config.smtp_port)
                .build()
        };

        Ok(Self { from, mailer })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> EmailResult<()> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{}: {e}", email.to)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Pick the sender the configuration asks for
pub fn create_email_sender(config: &EmailConfig) -> EmailResult<Arc<dyn EmailSender>> {
    if config.enabled {
        Ok(Arc::new(SmtpEmailSender::new(config)?))
    } else {
        Ok(Arc::new(LogEmailSender))
    }
}
