//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::email::create_email_sender;
use crate::http_server::{AppState, HttpServer};
use crate::observability::{init_tracing, AuditLog, FileAuditLog, TracingAuditLog};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, force } => init(&config, force),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write a default configuration file at `config_path`
pub fn init(config_path: &Path, force: bool) -> CliResult<()> {
    if config_path.exists() && !force {
        return Err(CliError::AlreadyInitialized(config_path.to_path_buf()));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&AppConfig::default())
        .map_err(|e| CliError::BootFailed(format!("serialize default config: {e}")))?;
    fs::write(config_path, json)?;

    println!("Wrote {}", config_path.display());
    println!("Set {} before serving in production.", crate::config::JWT_SECRET_ENV);
    Ok(())
}

/// Assemble the application state from configuration
pub fn build_state(config: &AppConfig) -> CliResult<AppState> {
    let sender = create_email_sender(&config.email)?;
    if !config.email.enabled {
        warn!("email disabled; outgoing messages are logged, not delivered");
    }

    let audit: Arc<dyn AuditLog> = match &config.audit_log_path {
        Some(path) => {
            let log = FileAuditLog::open(path)?;
            info!(path = %log.path().display(), "audit log opened");
            Arc::new(log)
        }
        None => {
            info!("no audit log path configured; audit records go to the log stream");
            Arc::new(TracingAuditLog)
        }
    };

    Ok(AppState::new(config, sender, audit))
}

/// Load configuration and serve the HTTP API until interrupted
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    init_tracing();

    let mut config = AppConfig::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::BootFailed(format!("Failed to create tokio runtime: {e}")))?;

    rt.block_on(async {
        let state = build_state(&config)?;
        HttpServer::new(config.server.clone(), state)
            .start()
            .await
            .map_err(|e| CliError::BootFailed(format!("HTTP server failed: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("roster.json");

        init(&path, false).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "{}").unwrap();

        assert!(matches!(
            init(&path, false),
            Err(CliError::AlreadyInitialized(_))
        ));
        init(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("max_login_attempts"));
    }

    #[test]
    fn test_build_state_with_file_audit() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            audit_log_path: Some(dir.path().join("audit.log")),
            ..Default::default()
        };

        build_state(&config).unwrap();
        assert!(dir.path().join("audit.log").exists());
    }

    #[tokio::test]
    async fn test_build_state_defaults_log_email_and_audit() {
        let state = build_state(&AppConfig::default()).unwrap();

        // The second registration sends a verification email through the log-only sender
        for email in ["first@example.com", "second@example.com"] {
            state
                .service
                .register(crate::users::RegisterRequest {
                    email: email.to_string(),
                    password: "MySuperPassword$1234".to_string(),
                    profile: Default::default(),
                })
                .await
                .unwrap();
        }
    }

    #[test]
    fn test_serve_missing_config_fails() {
        let dir = tempdir().unwrap();
        let err = serve(&dir.path().join("absent.json"), None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
