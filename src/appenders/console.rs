//! Console appender implementation

use crate::core::{Appender, AppenderCore, LogEvent, LogFormatter, LogLevel, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

/// Writes formatted events to standard output.
///
/// Each accepted event is written through a locked stdout handle while the
/// appender's own lock is held, so lines from concurrent callers are never
/// interleaved.
pub struct ConsoleAppender {
    core: AppenderCore<()>,
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            core: AppenderCore::new(LogLevel::Debug, ()),
            use_colors: false,
        }
    }

    /// Colour each line by level (requires the `console` feature)
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            core: AppenderCore::new(LogLevel::Debug, ()),
            use_colors,
        }
    }

    /// Set the threshold for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_pipeline::appenders::ConsoleAppender;
    /// use rust_log_pipeline::prelude::*;
    ///
    /// let appender = ConsoleAppender::new().with_level(LogLevel::Warn);
    /// assert_eq!(appender.level(), LogLevel::Warn);
    /// ```
    #[must_use]
    pub fn with_level(self, level: LogLevel) -> Self {
        self.core.set_level(level);
        self
    }

    /// Set the formatter for this appender
    #[must_use]
    pub fn with_formatter(self, formatter: Arc<LogFormatter>) -> Self {
        self.core.set_formatter(formatter);
        self
    }

    /// Wrap this appender for sharing between loggers
    #[must_use]
    pub fn shared(self) -> Arc<dyn Appender> {
        Arc::new(self)
    }

    #[cfg(feature = "console")]
    fn paint(&self, level: LogLevel, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        let body = text.trim_end_matches('\n');
        let newlines = &text[body.len()..];
        format!("{}{}", body.color(level.color_code()), newlines)
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, _level: LogLevel, text: &str) -> String {
        text.to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, level: LogLevel, event: &LogEvent) -> Result<()> {
        self.core.emit(level, event, |_, text| {
            let output = self.paint(level, text);
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            Ok(())
        })
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn level(&self) -> LogLevel {
        self.core.level()
    }

    fn set_level(&self, level: LogLevel) {
        self.core.set_level(level);
    }

    fn formatter(&self) -> Arc<LogFormatter> {
        self.core.formatter()
    }

    fn set_formatter(&self, formatter: Arc<LogFormatter>) {
        self.core.set_formatter(formatter);
    }

    fn clear_formatter(&self) {
        self.core.clear_formatter();
    }

    fn has_formatter(&self) -> bool {
        self.core.has_formatter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let appender = ConsoleAppender::default();
        assert_eq!(appender.name(), "console");
        assert_eq!(appender.level(), LogLevel::Debug);
        assert!(!appender.has_formatter());
    }

    #[test]
    fn test_append_below_threshold_is_noop() {
        let appender = ConsoleAppender::new().with_level(LogLevel::Fatal);
        let event = LogEvent::new("quiet");
        assert!(appender.append(LogLevel::Error, &event).is_ok());
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_paint_keeps_trailing_newline() {
        colored::control::set_override(true);
        let appender = ConsoleAppender::with_colors(true);
        let painted = appender.paint(LogLevel::Error, "boom\n");
        assert!(painted.ends_with('\n'));
        assert!(painted.contains("boom"));
        assert_ne!(painted, "boom\n");
    }

    #[test]
    fn test_paint_without_colors_is_identity() {
        let appender = ConsoleAppender::new();
        assert_eq!(appender.paint(LogLevel::Info, "plain\n"), "plain\n");
    }
}
