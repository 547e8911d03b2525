//! Event log service - append-only JSON-lines event log
//!
//! Privacy-safe: events record what happened and whether it worked, never
//! account addresses or session ids. One JSON object per line in
//! `events.jsonl` under the data directory, so the file stays greppable and
//! needs no database.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

const EVENT_LOG_FILE: &str = "events.jsonl";

/// What kind of thing happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionIssued,
    SessionCleared,
    LoginCompleted,
    LoginAbandoned,
    LoginFailed,
    AccountDisconnected,
    AccountsRefreshed,
    ProcessRun,
}

/// One logged event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub success: bool,
    /// Free-form detail; must never contain addresses or session ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub version: String,
}

/// Event log service
pub struct EventLogService {
    path: PathBuf,
    version: String,
}

impl EventLogService {
    pub fn new(data_dir: &Path, version: &str) -> Self {
        Self {
            path: data_dir.join(EVENT_LOG_FILE),
            version: version.to_string(),
        }
    }

    /// Append one event. Logging failures are the caller's choice to ignore;
    /// they should never break an operation.
    pub fn log(&self, kind: EventKind, success: bool, detail: Option<&str>) -> Result<()> {
        let event = LogEvent {
            timestamp: Utc::now(),
            kind,
            success,
            detail: detail.map(|d| d.to_string()),
            version: self.version.clone(),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(&event)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Read the most recent `limit` events, oldest first
    pub fn recent(&self, limit: usize) -> Result<Vec<LogEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        let mut events: Vec<LogEvent> = BufReader::new(file)
            .lines()
            .filter_map(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();
        if events.len() > limit {
            events.drain(..events.len() - limit);
        }
        Ok(events)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
