//! Appender trait for log output destinations

use super::{error::Result, formatter::LogFormatter, log_event::LogEvent, log_level::LogLevel};
use parking_lot::Mutex;
use std::sync::Arc;

/// A destination for formatted log text.
///
/// Appenders are shared as `Arc<dyn Appender>`: the same instance may be
/// attached to several loggers, and changing its level or formatter is seen
/// by all of them on their next call. That makes an appender the single
/// place to reconfigure one output for every logger that feeds it.
pub trait Appender: Send + Sync {
    /// Format and write `event` if `level` is at or above this appender's
    /// threshold. Events below the threshold return `Ok(())` untouched.
    fn append(&self, level: LogLevel, event: &LogEvent) -> Result<()>;

    fn flush(&self) -> Result<()>;

    fn name(&self) -> &str;

    fn level(&self) -> LogLevel;

    fn set_level(&self, level: LogLevel);

    /// Formatter used for the next write; the shared default when none is set
    fn formatter(&self) -> Arc<LogFormatter>;

    fn set_formatter(&self, formatter: Arc<LogFormatter>);

    /// Drop the configured formatter and go back to the shared default
    fn clear_formatter(&self);

    /// Whether a formatter was set explicitly
    fn has_formatter(&self) -> bool;
}

struct AppenderState<S> {
    level: LogLevel,
    formatter: Option<Arc<LogFormatter>>,
    sink: S,
}

/// Threshold, formatter and sink of one appender behind a single lock.
///
/// Concrete appenders embed an `AppenderCore` and only provide the write
/// step. The level check, formatting and the sink write run under one
/// guard, so concurrent callers never interleave partial lines and a
/// reconfiguration is either fully before or fully after a given write.
pub struct AppenderCore<S> {
    state: Mutex<AppenderState<S>>,
}

impl<S> AppenderCore<S> {
    pub fn new(level: LogLevel, sink: S) -> Self {
        Self {
            state: Mutex::new(AppenderState {
                level,
                formatter: None,
                sink,
            }),
        }
    }

    /// Run the gated write path: check `level`, format, hand the text to `write`.
    pub fn emit<F>(&self, level: LogLevel, event: &LogEvent, write: F) -> Result<()>
    where
        F: FnOnce(&mut S, &str) -> Result<()>,
    {
        let mut state = self.state.lock();
        if level < state.level {
            return Ok(());
        }

        let text = match state.formatter {
            Some(ref formatter) => formatter.format(level, event),
            None => LogFormatter::shared_default().format(level, event),
        };
        write(&mut state.sink, &text)
    }

    /// Run `f` with exclusive access to the sink
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.state.lock().sink)
    }

    pub fn level(&self) -> LogLevel {
        self.state.lock().level
    }

    pub fn set_level(&self, level: LogLevel) {
        self.state.lock().level = level;
    }

    pub fn formatter(&self) -> Arc<LogFormatter> {
        self.state
            .lock()
            .formatter
            .clone()
            .unwrap_or_else(LogFormatter::shared_default)
    }

    pub fn set_formatter(&self, formatter: Arc<LogFormatter>) {
        self.state.lock().formatter = Some(formatter);
    }

    pub fn clear_formatter(&self) {
        self.state.lock().formatter = None;
    }

    pub fn has_formatter(&self) -> bool {
        self.state.lock().formatter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(core: &AppenderCore<Vec<String>>, level: LogLevel, message: &str) {
        let event = LogEvent::new(message);
        core.emit(level, &event, |sink, text| {
            sink.push(text.to_string());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_threshold_gate() {
        let core = AppenderCore::new(LogLevel::Warn, Vec::new());
        capture(&core, LogLevel::Info, "dropped");
        capture(&core, LogLevel::Warn, "kept");
        capture(&core, LogLevel::Fatal, "kept too");

        core.with_sink(|lines| assert_eq!(lines.len(), 2));
    }

    #[test]
    fn test_falls_back_to_default_formatter() {
        let core = AppenderCore::new(LogLevel::Debug, Vec::<String>::new());
        assert!(!core.has_formatter());
        assert!(Arc::ptr_eq(&core.formatter(), &LogFormatter::shared_default()));
    }

    #[test]
    fn test_reconfiguration_applies_to_next_write() {
        let core = AppenderCore::new(LogLevel::Debug, Vec::new());
        core.set_formatter(LogFormatter::new("%p %m").shared());
        capture(&core, LogLevel::Info, "first");

        core.set_formatter(LogFormatter::new("<%m>").shared());
        core.set_level(LogLevel::Error);
        capture(&core, LogLevel::Info, "suppressed");
        capture(&core, LogLevel::Error, "second");

        core.clear_formatter();
        assert!(!core.has_formatter());

        core.with_sink(|lines| {
            assert_eq!(lines.as_slice(), ["INFO first", "<second>"]);
        });
    }

    #[test]
    fn test_lock_released_after_panicking_write() {
        let core = Arc::new(AppenderCore::new(LogLevel::Debug, Vec::<String>::new()));
        let panicking = Arc::clone(&core);
        let result = std::thread::spawn(move || {
            let event = LogEvent::new("boom");
            let _ = panicking.emit(LogLevel::Info, &event, |_, _| panic!("sink exploded"));
        })
        .join();
        assert!(result.is_err());

        capture(&core, LogLevel::Info, "still usable");
        core.with_sink(|lines| assert_eq!(lines.len(), 1));
    }
}
