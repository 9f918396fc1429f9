//! Observability for roster
//!
//! - Structured JSON logs through `tracing`
//! - Append-only audit trail of privileged account actions

pub mod audit;

pub use audit::{
    AuditAction, AuditLog, AuditOutcome, AuditRecord, FileAuditLog, MemoryAuditLog, TracingAuditLog,
};

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Install the global JSON subscriber. `RUST_LOG` overrides the default
/// filter. Calling twice only logs a warning.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Append to the audit log; failure is logged, never propagated
pub fn record_audit(log: &dyn AuditLog, record: AuditRecord) {
    if let Err(e) = log.append(&record) {
        warn!(error = %e, action = %record.action, "audit append failed");
    }
}
