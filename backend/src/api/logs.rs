//! Real-time log streaming via Server-Sent Events (SSE).
//!
//! Pipeline progress goes through a broadcast channel that the `/api/logs`
//! endpoint streams to frontend clients. Every entry is also echoed to
//! stderr, so CLI output on stdout stays clean.
//!
//! Entries written through a [`JobLog`] carry the upload's job id, and an
//! SSE subscriber only ever sees the entries of the job it asked for.
//! Entries without a job id stay on stderr.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Entries buffered per subscriber before it lags
const CHANNEL_CAPACITY: usize = 1024;

/// Log level for frontend display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for sub-steps
    #[serde(default)]
    pub indent: u8,
    /// Local time, `HH:MM:SS`
    pub timestamp: String,
    /// Upload this entry belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            job_id: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    pub fn for_job(mut self, job_id: Option<String>) -> Self {
        self.job_id = job_id;
        self
    }

    /// Whether a subscriber of `job` may see this entry.
    pub fn belongs_to(&self, job: &str) -> bool {
        self.job_id.as_deref() == Some(job)
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to all connected SSE clients
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Echo to stderr and send to subscribers
    pub fn log(&self, entry: LogEntry) {
        let prefix = match entry.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(entry.indent as usize);
        eprintln!("{}{} {}", indent, prefix, entry.message);

        // untagged entries never reach SSE clients
        if entry.job_id.is_some() {
            // no receivers is fine
            let _ = self.sender.send(entry);
        }
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Logger for one pipeline run.
///
/// Tags every entry with the run's job id. A run without a job id (the
/// CLI) only logs to stderr.
#[derive(Debug, Clone, Default)]
pub struct JobLog {
    job_id: Option<String>,
}

impl JobLog {
    pub fn new(job_id: Option<String>) -> Self {
        Self { job_id }
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    fn emit(&self, entry: LogEntry) {
        LOG_BROADCASTER.log(entry.for_job(self.job_id.clone()));
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.emit(LogEntry::info(msg));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.emit(LogEntry::success(msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.emit(LogEntry::warning(msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.emit(LogEntry::error(msg));
    }

    pub fn info_indent(&self, msg: impl Into<String>, indent: u8) {
        self.emit(LogEntry::info(msg).with_indent(indent));
    }

    pub fn warning_indent(&self, msg: impl Into<String>, indent: u8) {
        self.emit(LogEntry::warning(msg).with_indent(indent));
    }
}

/// Log a request-level error that belongs to no job.
pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg));
}
