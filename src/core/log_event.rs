//! Log event structure

use super::process;
use chrono::{DateTime, Utc};

/// One log occurrence.
///
/// Built once at the call site and then only read: loggers and appenders
/// receive it by shared reference, so a single event can be formatted by
/// any number of appenders without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    file: Option<String>,
    line: u32,
    elapsed_ms: u64,
    thread_id: u64,
    thread_name: Option<String>,
    fiber_id: u64,
    message: String,
    timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a single event can never forge additional log lines.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Capture an event for `message` on the calling thread.
    pub fn new(message: impl AsRef<str>) -> Self {
        Self {
            file: None,
            line: 0,
            elapsed_ms: process::elapsed_ms(),
            thread_id: process::current_thread_id(),
            thread_name: process::current_thread_name(),
            fiber_id: process::current_fiber_id(),
            message: Self::sanitize_message(message.as_ref()),
            timestamp: process::now_wallclock(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = if file.is_empty() {
            None
        } else {
            Some(file.to_string())
        };
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    #[must_use]
    pub fn with_fiber_id(mut self, fiber_id: u64) -> Self {
        self.fiber_id = fiber_id;
        self
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Source line, 0 when unknown
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    pub fn fiber_id(&self) -> u64 {
        self.fiber_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }
}
