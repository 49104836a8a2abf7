//! File appender implementation

use crate::core::{Appender, AppenderCore, LogEvent, LogFormatter, LogLevel, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Appends formatted events to a file.
///
/// The file is opened in append mode when the appender is created and is
/// owned exclusively by it. Every accepted line is written and flushed
/// before `append` returns, trading throughput for durability.
pub struct FileAppender {
    core: AppenderCore<File>,
    path: PathBuf,
}

impl FileAppender {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileAppenderError`] if the file cannot be opened
    /// for writing.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = Self::open(&path)?;

        Ok(Self {
            core: AppenderCore::new(LogLevel::Debug, file),
            path,
        })
    }

    fn open(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::file_appender(path.display().to_string(), e.to_string()))
    }

    /// Set the threshold for this appender
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_log_pipeline::appenders::FileAppender;
    /// use rust_log_pipeline::prelude::*;
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_level(LogLevel::Info);
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

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reopen the configured path, e.g. after the file was moved away by an
    /// external rotation tool.
    ///
    /// On failure the current handle is kept.
    ///
    /// # Errors
    ///
    /// [`LoggerError::FileAppenderError`] if the path cannot be opened, or
    /// [`LoggerError::IoOperation`] if the current handle fails to flush.
    pub fn reopen(&self) -> Result<()> {
        let file = Self::open(&self.path)?;
        self.core.with_sink(|current| {
            current.flush().map_err(|e| {
                LoggerError::io_operation(
                    "reopening log file",
                    format!("flush of '{}' failed", self.path.display()),
                    e,
                )
            })?;
            *current = file;
            Ok(())
        })
    }
}

impl Appender for FileAppender {
    fn append(&self, level: LogLevel, event: &LogEvent) -> Result<()> {
        self.core.emit(level, event, |file, text| {
            file.write_all(text.as_bytes())?;
            file.flush()?;
            Ok(())
        })
    }

    fn flush(&self) -> Result<()> {
        self.core.with_sink(|file| file.flush())?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
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

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_formatted_lines_in_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("app.log");
        let appender = FileAppender::new(&path)
            .expect("Failed to create appender")
            .with_formatter(LogFormatter::new("%p %m%n").shared());

        appender.append(LogLevel::Info, &LogEvent::new("one")).unwrap();
        appender.append(LogLevel::Error, &LogEvent::new("two")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "INFO one\nERROR two\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("existing.log");
        std::fs::write(&path, "previous\n").unwrap();

        let appender = FileAppender::new(&path)
            .unwrap()
            .with_formatter(LogFormatter::new("%m%n").shared());
        appender.append(LogLevel::Warn, &LogEvent::new("next")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous\nnext\n");
    }

    #[test]
    fn test_unopenable_path_fails_construction() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing-dir").join("app.log");

        let err = FileAppender::new(&path).err().expect("construction should fail");
        assert!(matches!(err, LoggerError::FileAppenderError { .. }));
        assert!(err.to_string().contains("missing-dir"));
    }

    #[test]
    fn test_reopen_after_external_move() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("rotated.log");
        let moved = temp_dir.path().join("rotated.log.1");

        let appender = FileAppender::new(&path)
            .unwrap()
            .with_formatter(LogFormatter::new("%m%n").shared());
        appender.append(LogLevel::Info, &LogEvent::new("before")).unwrap();

        std::fs::rename(&path, &moved).unwrap();
        appender.reopen().unwrap();
        appender.append(LogLevel::Info, &LogEvent::new("after")).unwrap();

        assert_eq!(std::fs::read_to_string(&moved).unwrap(), "before\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after\n");
        assert_eq!(appender.path(), path.as_path());
    }

    #[test]
    fn test_failed_reopen_keeps_current_handle() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_dir = temp_dir.path().join("logs");
        std::fs::create_dir(&log_dir).unwrap();
        let path = log_dir.join("app.log");

        let appender = FileAppender::new(&path)
            .unwrap()
            .with_formatter(LogFormatter::new("%m%n").shared());
        std::fs::remove_dir_all(&log_dir).unwrap();

        let err = appender.reopen().err().expect("reopen should fail");
        assert!(matches!(err, LoggerError::FileAppenderError { .. }));
        appender.append(LogLevel::Info, &LogEvent::new("still open")).unwrap();
        appender.flush().unwrap();
    }
}
