//! Event log for lock sessions.
//!
//! When an event log is configured, every executed command appends two
//! NDJSON records (one JSON object per line): one when the request is
//! issued and one when it returns. Comparing the two timestamps shows how
//! long a blocking request waited.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `requested` or `received`
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `pid`: the process performing the operation
//! - `operation`, `offset`, `length`: the request
//! - `outcome`: `success` or the failure text (received records only)
//! - `details`: freeform object, e.g. the holder found by a test query

use crate::error::{RangerError, Result};
use crate::locks::{LockRequest, LockResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A request is about to be handed to the lock primitive.
    Requested,
    /// The lock primitive returned.
    Received,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Requested => write!(f, "requested"),
            EventAction::Received => write!(f, "received"),
        }
    }
}

/// One record in the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    pub actor: String,

    pub pid: u32,

    /// Operation symbol (`X`, `S`, `T` or `U`).
    pub operation: String,

    pub offset: u64,

    pub length: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    pub details: Value,
}

impl Event {
    /// Record for a request that is about to be executed.
    pub fn requested(actor: &str, request: &LockRequest) -> Self {
        Self {
            ts: Utc::now(),
            action: EventAction::Requested,
            actor: actor.to_string(),
            pid: std::process::id(),
            operation: request.operation.symbol().to_string(),
            offset: request.range.offset,
            length: request.range.length,
            outcome: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Record for a request that has returned with `result`.
    pub fn received(actor: &str, request: &LockRequest, result: &LockResult) -> Self {
        let outcome = match result.failure_reason() {
            None => "success".to_string(),
            Some(reason) => format!("failure: {}", reason),
        };

        let mut event = Self::requested(actor, request);
        event.action = EventAction::Received;
        event.outcome = Some(outcome);

        if let Some(holder) = &result.holder {
            event.details = json!({
                "holder": {
                    "pid": holder.pid,
                    "kind": holder.kind.as_str(),
                    "offset": holder.range.offset,
                    "length": holder.range.length,
                }
            });
        }
        event
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| RangerError::IoError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// An append-only NDJSON event file.
#[derive(Debug)]
pub struct EventLog {
    file: File,
    path: PathBuf,
    actor: String,
}

impl EventLog {
    /// Open `path` for appending, creating the file if needed. The actor
    /// recorded in every event is resolved here, once.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                RangerError::OpenError(format!(
                    "failed to open event log '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            actor: get_actor_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Append one event as a single line.
    pub fn append(&mut self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        writeln!(self.file, "{}", json_line).map_err(|e| {
            RangerError::IoError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}
