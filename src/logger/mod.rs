//! Activity logging: a pluggable sink for sync and command events.
//!
//! Failures inside the sync layer never reach the view (it keeps showing the
//! last good snapshot), so this sink is the only place they become visible. Tests inject [`MemorySink`] to assert on them.

#![allow(missing_docs)]

pub mod jsonl;

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::errors::HecError;

pub use jsonl::{JsonlConfig, JsonlSink};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Event types emitted by the sync and toggle layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SyncStarted,
    SyncStopped,
    RefreshFailed,
    RefreshDiscarded,
    CommandIssued,
    CommandFailed,
    CommandSkipped,
}

impl EventType {
    /// Upper-case tag used by line-oriented sinks.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::SyncStarted => "SYNC-START",
            Self::SyncStopped => "SYNC-STOP",
            Self::RefreshFailed => "REFRESH-FAIL",
            Self::RefreshDiscarded => "REFRESH-DISCARD",
            Self::CommandIssued => "COMMAND",
            Self::CommandFailed => "COMMAND-FAIL",
            Self::CommandSkipped => "COMMAND-SKIP",
        }
    }
}

/// A single activity record — all fields optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Backend endpoint involved, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// `start` or `stop` for command events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Refresh sequence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            endpoint: None,
            command: None,
            seq: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    /// Attach an error's code and message.
    #[must_use]
    pub fn with_error(mut self, err: &HecError) -> Self {
        self.error_code = Some(err.code().to_string());
        self.error_message = Some(err.to_string());
        if let Some(endpoint) = err.endpoint() {
            self.endpoint = Some(endpoint.to_string());
        }
        self
    }

    #[must_use]
    pub const fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Destination for activity records. Must never fail or block for long.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

/// Writes one `[HEC-<TAG>]` line per entry to stderr.
#[derive(Debug, Default)]
pub struct StderrSink;

impl StderrSink {
    /// The single line written for `entry`, without the newline.
    #[must_use]
    pub fn format_line(entry: &LogEntry) -> String {
        let mut line = format!("[HEC-{}] {}", entry.event.tag(), entry.ts);
        if let Some(endpoint) = &entry.endpoint {
            line.push_str(&format!(" endpoint={endpoint}"));
        }
        if let Some(command) = &entry.command {
            line.push_str(&format!(" command={command}"));
        }
        if let Some(seq) = entry.seq {
            line.push_str(&format!(" seq={seq}"));
        }
        if let Some(message) = &entry.error_message {
            line.push_str(&format!(" error={message}"));
        }
        if let Some(details) = &entry.details {
            line.push_str(&format!(" {details}"));
        }
        line
    }
}

impl LogSink for StderrSink {
    fn record(&self, entry: &LogEntry) {
        let _ = writeln!(io::stderr(), "{}", Self::format_line(entry));
    }
}

/// Drops everything. Used where the caller explicitly opts out of logging.
#[derive(Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn record(&self, _entry: &LogEntry) {}
}

/// Keeps entries in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Events recorded so far, in order.
    pub fn events(&self) -> Vec<EventType> {
        self.entries.lock().iter().map(|e| e.event).collect()
    }

    pub fn count(&self, event: EventType) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.event == event)
            .count()
    }
}

impl LogSink for MemorySink {
    fn record(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}

/// Forwards every entry to each wrapped sink in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutSink {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl LogSink for FanoutSink {
    fn record(&self, entry: &LogEntry) {
        for sink in &self.sinks {
            sink.record(entry);
        }
    }
}

/// Format current UTC time as ISO 8601.
pub(crate) fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
