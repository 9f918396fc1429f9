//! Email errors.

use thiserror::Error;

pub type EmailResult<T> = Result<T, EmailError>;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown email template: {0}")]
    UnknownTemplate(String),

    #[error("Template {template} requires field {field}")]
    MissingField {
        template: &'static str,
        field: &'static str,
    },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}
