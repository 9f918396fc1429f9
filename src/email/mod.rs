//! # Email Integration
//!
//! Templated account notifications (verification, professional promotion).

pub mod errors;
pub mod sender;
pub mod service;
pub mod templates;

pub use errors::{EmailError, EmailResult};
pub use sender::{
    create_email_sender, EmailConfig, EmailSender, LogEmailSender, MemoryEmailSender,
    OutgoingEmail, SmtpEmailSender,
};
pub use service::{EmailService, UserEmailData};
pub use templates::{EmailKind, RenderedEmail, TemplateManager};
