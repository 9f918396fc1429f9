//! CLI error types. Every CLI error is fatal: `main` prints it and exits 1.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::email::EmailError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("ROSTER_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("ROSTER_CLI_ALREADY_INITIALIZED: {} already exists (use --force to overwrite)", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("ROSTER_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("ROSTER_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl From<EmailError> for CliError {
    fn from(e: EmailError) -> Self {
        Self::BootFailed(format!("email transport: {e}"))
    }
}

pub type CliResult<T> = Result<T, CliError>;
