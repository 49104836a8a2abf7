//! Main logger implementation

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    log_event::LogEvent,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Name of the well-known default logger
pub const ROOT_LOGGER_NAME: &str = "root";

/// Callback invoked when an appender fails to write an event.
///
/// Receives the name of the failing appender and the error. Without a
/// callback, failures are reported on stderr.
pub type ErrorCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

/// A named, level-filtered fan-out point.
///
/// `log` first checks the logger's own threshold, then hands the event to
/// every attached appender in insertion order; each appender applies its
/// own threshold afterwards. A failing or panicking appender never stops
/// delivery to the ones after it, and `log` itself never fails.
///
/// All methods take `&self`, so a logger can be shared as `Arc<Logger>`
/// and reconfigured while other threads are logging through it.
pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    appenders: RwLock<Vec<Arc<dyn Appender>>>,
    metrics: LoggerMetrics,
    on_error: Option<ErrorCallback>,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LogLevel::Debug),
            appenders: RwLock::new(Vec::new()),
            metrics: LoggerMetrics::new(),
            on_error: None,
        }
    }

    /// Create a logger named `root`
    #[must_use]
    pub fn root() -> Self {
        Self::new(ROOT_LOGGER_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Whether an event at `level` passes this logger's threshold
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    /// Attach an appender at the end of the dispatch order.
    ///
    /// The same instance may be added more than once; it then receives each
    /// event once per registration.
    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    /// Detach the first registration of this exact appender instance.
    ///
    /// Matching is by identity: a different instance with the same
    /// configuration is not removed. Returns whether anything was removed.
    pub fn remove_appender(&self, appender: &Arc<dyn Appender>) -> bool {
        let mut appenders = self.appenders.write();
        let position = appenders
            .iter()
            .position(|candidate| std::ptr::addr_eq(Arc::as_ptr(candidate), Arc::as_ptr(appender)));

        match position {
            Some(index) => {
                appenders.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_appenders(&self) {
        self.appenders.write().clear();
    }

    /// Replace the whole appender list in one step.
    ///
    /// Concurrent `log` calls see either the previous list or the new one,
    /// never an empty or partially rebuilt list.
    pub fn set_appenders(&self, appenders: Vec<Arc<dyn Appender>>) {
        *self.appenders.write() = appenders;
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    /// Snapshot of the attached appenders in dispatch order
    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        self.appenders.read().clone()
    }

    pub fn log(&self, level: LogLevel, event: &LogEvent) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.metrics.record_dispatched();

        // Dispatch from a snapshot so reconfiguration never waits on I/O and
        // an in-flight call never sees a half-updated list.
        let appenders = self.appenders();
        for (idx, appender) in appenders.iter().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(level, event)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.report_failure(idx, appender.as_ref(), &e, false),
                Err(panic_info) => {
                    let err = LoggerError::other(format!(
                        "appender panicked: {}",
                        panic_message(&*panic_info)
                    ));
                    self.report_failure(idx, appender.as_ref(), &err, true);
                }
            }
        }
    }

    fn report_failure(&self, idx: usize, appender: &dyn Appender, err: &LoggerError, panicked: bool) {
        self.metrics.record_failed_write();

        if let Some(ref callback) = self.on_error {
            callback(appender.name(), err);
        } else if panicked {
            eprintln!(
                "[LOGGER CRITICAL] Logger '{}': appender #{} ({}) {}. \
                 Other appenders continue to function.",
                self.name,
                idx,
                appender.name(),
                err
            );
        } else {
            eprintln!(
                "[LOGGER ERROR] Logger '{}': appender #{} ({}) failed: {}",
                self.name,
                idx,
                appender.name(),
                err
            );
        }
    }

    pub fn debug(&self, event: &LogEvent) {
        self.log(LogLevel::Debug, event);
    }

    pub fn info(&self, event: &LogEvent) {
        self.log(LogLevel::Info, event);
    }

    pub fn warn(&self, event: &LogEvent) {
        self.log(LogLevel::Warn, event);
    }

    pub fn error(&self, event: &LogEvent) {
        self.log(LogLevel::Error, event);
    }

    pub fn fatal(&self, event: &LogEvent) {
        self.log(LogLevel::Fatal, event);
    }

    /// Flush every attached appender.
    ///
    /// All appenders are flushed even if some fail; the first error is
    /// returned.
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for appender in self.appenders() {
            if let Err(e) = appender.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Get logger metrics for observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Create a builder for a logger named `name`
    ///
    /// # Example
    /// ```
    /// use rust_log_pipeline::prelude::*;
    ///
    /// let logger = Logger::builder("net")
    ///     .min_level(LogLevel::Warn)
    ///     .build();
    /// assert_eq!(logger.name(), "net");
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("appenders", &self.appender_count())
            .finish()
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for creating a Logger with fluent API
///
/// # Example
/// ```
/// use rust_log_pipeline::prelude::*;
///
/// let logger = LoggerBuilder::new("app")
///     .min_level(LogLevel::Info)
///     .appender(ConsoleAppender::new().shared())
///     .build();
/// assert_eq!(logger.appender_count(), 1);
/// ```
pub struct LoggerBuilder {
    name: String,
    min_level: LogLevel,
    appenders: Vec<Arc<dyn Appender>>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Debug,
            appenders: Vec::new(),
            on_error: None,
        }
    }

    /// Set the minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender(mut self, appender: Arc<dyn Appender>) -> Self {
        self.appenders.push(appender);
        self
    }

    /// Set a callback for appender failures
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_pipeline::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let logger = Logger::builder("app")
    ///     .on_error(Arc::new(|appender: &str, err: &LoggerError| {
    ///         eprintln!("appender {} failed: {}", appender, err);
    ///     }))
    ///     .build();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            name: self.name,
            min_level: RwLock::new(self.min_level),
            appenders: RwLock::new(self.appenders),
            metrics: LoggerMetrics::new(),
            on_error: self.on_error,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new(ROOT_LOGGER_NAME)
    }
}
