//! Audit history and scoring
//!
//! Every attempted request or release appends one immutable [`HistoryEntry`]
//! to the session's [`HistoryLog`]; entries are never edited or removed, and
//! append order is chronological order. The log is the sole record of what
//! happened in a round.
//!
//! Scoring lives beside the history because both advance on the same events:
//! a process is worth [`PROCESS_POINTS`] the first time a granted request
//! drives its need to zero, and finishing every process adds
//! [`COMPLETION_BONUS`] exactly once.

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Points awarded the first time a process's need reaches the zero vector.
pub const PROCESS_POINTS: u32 = 10;

/// One-time bonus awarded when every process has completed.
pub const COMPLETION_BONUS: u32 = 50;

/// Kind of state-changing action recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Request,
    Release,
}

/// Immutable audit record of one attempted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unix-epoch milliseconds at append time
    pub timestamp: i64,
    /// Process the action targeted
    pub process: usize,
    pub action: ActionKind,
    /// Requested vector; `None` for releases
    pub request: Option<Vec<u32>>,
    pub granted: bool,
    /// Human-readable outcome, suitable for direct display
    pub reason: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        process: usize,
        action: ActionKind,
        request: Option<Vec<u32>>,
        granted: bool,
        reason: impl Into<String>,
    ) -> Self {
        HistoryEntry {
            timestamp: Utc::now().timestamp_millis(),
            process,
            action,
            request,
            granted,
            reason: reason.into(),
        }
    }
}

/// Append-only sequence of audit entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        HistoryLog {
            entries: Vec::new(),
        }
    }

    /// Append an entry; entries cannot be modified afterwards.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the full trail as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}
