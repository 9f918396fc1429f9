//! Audit Logging
//!
//! Every privileged account action is appended to an audit log, including
//! rejected attempts.
//! - One JSON record per line
//! - Append-only; no purging or retention here
//! - File writes are synced before `append` returns

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Audit action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Self-registration completed.
    UserRegistered,

    /// Account created by an administrator.
    UserCreated,

    /// Account edited by an administrator.
    UserUpdated,

    /// Account deleted by an administrator.
    UserDeleted,

    /// Professional status granted.
    PromotionGranted,

    /// Promotion attempted without sufficient role.
    PromotionDenied,

    /// Account locked after repeated failed logins.
    AccountLocked,
}

impl AuditAction {
    /// Returns the action name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserRegistered => "USER_REGISTERED",
            AuditAction::UserCreated => "USER_CREATED",
            AuditAction::UserUpdated => "USER_UPDATED",
            AuditAction::UserDeleted => "USER_DELETED",
            AuditAction::PromotionGranted => "PROMOTION_GRANTED",
            AuditAction::PromotionDenied => "PROMOTION_DENIED",
            AuditAction::AccountLocked => "ACCOUNT_LOCKED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit record outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    /// Action succeeded.
    Success,

    /// Action was rejected.
    Rejected,

    /// Action had no effect (e.g. already applied).
    Noop,
}

/// A single audit record.
///
/// Each record includes: timestamp, action, actor, target, outcome.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Unique record ID.
    pub id: Uuid,

    /// When the action occurred.
    pub ts: DateTime<Utc>,

    /// The action that occurred.
    pub action: AuditAction,

    /// Outcome of the action.
    pub outcome: AuditOutcome,

    /// Acting user (absent for self-service and system actions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<Uuid>,

    /// Role of the acting user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<String>,

    /// Account acted upon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<Uuid>,

    /// Free-form detail (e.g. rejection reason).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditRecord {
    /// Create a new audit record.
    pub fn new(action: AuditAction, outcome: AuditOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            action,
            outcome,
            actor_id: None,
            actor_role: None,
            target_id: None,
            detail: None,
        }
    }

    /// Set the acting user.
    pub fn with_actor(mut self, id: Uuid, role: impl Into<String>) -> Self {
        self.actor_id = Some(id);
        self.actor_role = Some(role.into());
        self
    }

    /// Set target ID.
    pub fn with_target(mut self, id: Uuid) -> Self {
        self.target_id = Some(id);
        self
    }

    /// Set detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_json(&self) -> io::Result<String> {
        serde_json::to_string(self).map_err(io::Error::other)
    }
}

/// Audit log trait.
///
/// Implementations must be append-only. A record must be visible once
/// `append` returns.
pub trait AuditLog: Send + Sync {
    /// Append a record to the audit log.
    fn append(&self, record: &AuditRecord) -> io::Result<()>;
}

fn poisoned() -> io::Error {
    io::Error::other("audit log lock poisoned")
}

/// File-based audit log implementation.
pub struct FileAuditLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileAuditLog {
    /// Open or create an audit log file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Get the audit log path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let json = record.to_json()?;
        let mut writer = self.writer.lock().map_err(|_| poisoned())?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        writer.get_ref().sync_data()
    }
}

/// Audit log emitted on the `audit` tracing target, one event per record.
///
/// Used when no audit file is configured; nothing is kept in process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let json = record.to_json()?;
        info!(target: "audit", action = %record.action, record = %json, "audit record");
        Ok(())
    }
}

/// In-memory audit log.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditLog {
    /// Create a new in-memory audit log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded entries.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Records for one action.
    pub fn records_for(&self, action: AuditAction) -> Vec<AuditRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.action == action)
            .collect()
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        self.records
            .lock()
            .map_err(|_| poisoned())?
            .push(record.clone());
        Ok(())
    }
}
