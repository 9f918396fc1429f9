//! Application configuration
//!
//! Loaded from a JSON file; every section has defaults so a minimal file
//! (`{}`) is valid. Secrets can be supplied through the environment:
//!
//! - `ROSTER_JWT_SECRET` overrides `jwt.secret`
//! - `ROSTER_SMTP_PASSWORD` overrides `email.smtp_password`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{JwtConfig, PasswordPolicy};
use crate::email::EmailConfig;
use crate::http_server::HttpServerConfig;
use crate::users::AccountSettings;

pub const JWT_SECRET_ENV: &str = "ROSTER_JWT_SECRET";
pub const SMTP_PASSWORD_ENV: &str = "ROSTER_SMTP_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_max_login_attempts() -> u32 {
    3
}

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub password_policy: PasswordPolicy,

    /// Consecutive failed logins before an account locks (default: 3)
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    /// JSON-lines audit file; when unset, audit records are emitted as `tracing` events
    #[serde(default)]
    pub audit_log_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            jwt: JwtConfig::default(),
            email: EmailConfig::default(),
            password_policy: PasswordPolicy::default(),
            max_login_attempts: default_max_login_attempts(),
            audit_log_path: None,
        }
    }
}

impl AppConfig {
    /// Read, apply environment overrides, then validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup(JWT_SECRET_ENV).filter(|v| !v.is_empty()) {
            self.jwt.secret = secret;
        }
        if let Some(password) = lookup(SMTP_PASSWORD_ENV).filter(|v| !v.is_empty()) {
            self.email.smtp_password = password;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt.secret must not be empty".to_string()));
        }
        if self.jwt.access_token_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "jwt.access_token_minutes must be > 0".to_string(),
            ));
        }
        if self.max_login_attempts == 0 {
            return Err(ConfigError::Invalid("max_login_attempts must be > 0".to_string()));
        }
        if self.password_policy.min_length == 0 {
            return Err(ConfigError::Invalid(
                "password_policy.min_length must be > 0".to_string(),
            ));
        }
        if !(self.email.base_url.starts_with("http://") || self.email.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "email.base_url must be an http(s) URL, got '{}'",
                self.email.base_url
            )));
        }
        if self.email.enabled && self.email.smtp_host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "email.smtp_host is required when email is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn account_settings(&self) -> AccountSettings {
        AccountSettings {
            password_policy: self.password_policy.clone(),
            max_login_attempts: self.max_login_attempts,
        }
    }
}
