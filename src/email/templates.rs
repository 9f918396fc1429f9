//! # Email Templates
//!
//! Named plain-text templates, each wrapped in the shared header and footer.
//! Placeholders are written `{field}`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::errors::{EmailError, EmailResult};

const HEADER: &str = "Roster\n======\n\n";

const FOOTER: &str = "\n\n--\n\
    You are receiving this email because you have an account with Roster.\n\
    If this wasn't you, please contact support.\n";

/// Template identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailKind {
    EmailVerification,
    ProPromotion,
}

impl EmailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::EmailVerification => "email_verification",
            EmailKind::ProPromotion => "pro_promotion",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            EmailKind::EmailVerification => "Verify Your Email Address",
            EmailKind::ProPromotion => "Congratulations on Your Professional Upgrade",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            EmailKind::EmailVerification => {
                "Hi {name},\n\n\
                Thanks for signing up. Please verify your email address by opening the link below:\n\n\
                {verification_url}\n\n\
                If you didn't create an account, you can ignore this email."
            }
            EmailKind::ProPromotion => {
                "Hi {name},\n\n\
                Good news: your account has been upgraded to Professional Membership.\n\n\
                Your profile now shows your professional status, and you have access to \
                everything that comes with it.\n\n\
                Thank you for being part of the community."
            }
        }
    }

    fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EmailKind::EmailVerification => &["name", "verification_url"],
            EmailKind::ProPromotion => &["name"],
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailKind {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(EmailKind::EmailVerification),
            "pro_promotion" => Ok(EmailKind::ProPromotion),
            other => Err(EmailError::UnknownTemplate(other.to_string())),
        }
    }
}

/// Rendered subject and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Renders templates against a field map
#[derive(Debug, Clone, Default)]
pub struct TemplateManager;

impl TemplateManager {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        kind: EmailKind,
        fields: &HashMap<&str, String>,
    ) -> EmailResult<RenderedEmail> {
        let mut body = kind.body().to_string();
        for &field in kind.required_fields() {
            let value = fields.get(field).ok_or(EmailError::MissingField {
                template: kind.as_str(),
                field,
            })?;
            body = body.replace(&format!("{{{field}}}"), value);
        }

        Ok(RenderedEmail {
            subject: kind.subject().to_string(),
            body: format!("{HEADER}{body}{FOOTER}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_template() {
        let fields = HashMap::from([
            ("name", "Test User".to_string()),
            (
                "verification_url",
                "http://example.com/verify?token=abc123".to_string(),
            ),
        ]);

        let email = TemplateManager::new()
            .render(EmailKind::EmailVerification, &fields)
            .unwrap();

        assert_eq!(email.subject, "Verify Your Email Address");
        assert!(email.body.starts_with(HEADER));
        assert!(email.body.ends_with(FOOTER));
        assert!(email.body.contains("Test User"));
        assert!(email.body.contains("http://example.com/verify?token=abc123"));
        assert!(!email.body.contains('{'));
    }

    #[test]
    fn test_promotion_template() {
        let fields = HashMap::from([("name", "Pat".to_string())]);
        let email = TemplateManager::new()
            .render(EmailKind::ProPromotion, &fields)
            .unwrap();

        assert!(email.subject.contains("Congratulations on Your Professional Upgrade"));
        assert!(email.body.contains("Professional Membership"));
    }

    #[test]
    fn test_missing_field_reported() {
        let fields = HashMap::from([("name", "Pat".to_string())]);
        let err = TemplateManager::new()
            .render(EmailKind::EmailVerification, &fields)
            .unwrap_err();

        assert!(matches!(
            err,
            EmailError::MissingField {
                field: "verification_url",
                ..
            }
        ));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            "pro_promotion".parse::<EmailKind>().unwrap(),
            EmailKind::ProPromotion
        );
        assert!("welcome".parse::<EmailKind>().is_err());
    }
}
