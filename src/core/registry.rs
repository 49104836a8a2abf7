//! Name → logger registry
//!
//! Every registry owns a `root` logger. Other loggers are created on first
//! lookup and start with no appenders, so they drop everything until they
//! are wired up.

use super::appender::Appender;
use super::config::{AppenderConfig, LoggingConfig};
use super::error::{LoggerError, Result};
use super::formatter::LogFormatter;
use super::logger::{Logger, ROOT_LOGGER_NAME};
use crate::appenders::{ConsoleAppender, FileAppender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

/// Shared mapping from logger name to [`Logger`].
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
/// use std::sync::Arc;
///
/// let registry = LoggerRegistry::new();
/// let db = registry.get_logger("db");
/// assert!(Arc::ptr_eq(&db, &registry.get_logger("db")));
/// assert_eq!(registry.root().name(), "root");
/// ```
pub struct LoggerRegistry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// Registry whose root logger has no appenders
    pub fn new() -> Self {
        Self::with_root(Logger::root())
    }

    /// Registry whose root logger writes to the console
    pub fn with_console_root() -> Self {
        let root = Logger::root();
        root.add_appender(ConsoleAppender::new().shared());
        Self::with_root(root)
    }

    fn with_root(root: Logger) -> Self {
        Self {
            root: Arc::new(root),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide registry, created on first use with a console root
    pub fn global() -> &'static LoggerRegistry {
        GLOBAL_REGISTRY.get_or_init(LoggerRegistry::with_console_root)
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Return the logger named `name`, creating it if needed
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if let Some(logger) = self.lookup(name) {
            return logger;
        }

        let mut loggers = self.loggers.write();
        Arc::clone(
            loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new(name))),
        )
    }

    /// Return the logger named `name` without creating it
    pub fn lookup(&self, name: &str) -> Option<Arc<Logger>> {
        if name == ROOT_LOGGER_NAME {
            return Some(self.root());
        }
        self.loggers.read().get(name).cloned()
    }

    /// Remove a logger from the registry.
    ///
    /// Holders of the returned `Arc` keep a working logger; later lookups
    /// create a fresh one. The root logger cannot be removed.
    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        if name == ROOT_LOGGER_NAME {
            return None;
        }
        self.loggers.write().remove(name)
    }

    /// Names of all registered loggers, root first, the rest sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names.insert(0, ROOT_LOGGER_NAME.to_string());
        names
    }

    /// Wire loggers and appenders from a declarative configuration.
    ///
    /// Every named appender is built once and shared by all loggers that
    /// reference it; its formatter comes from its own entry only. A
    /// configured logger's appender list is replaced in one step, not
    /// extended. Nothing is changed if any appender fails to open or a
    /// logger references an unknown appender.
    ///
    /// # Errors
    ///
    /// Returns the first appender construction error, or
    /// [`LoggerError::InvalidConfiguration`] for an unknown appender name.
    pub fn apply_config(&self, config: &LoggingConfig) -> Result<()> {
        let mut built: HashMap<&str, Arc<dyn Appender>> = HashMap::new();
        for (name, appender_config) in &config.appenders {
            built.insert(name.as_str(), Self::build_appender(appender_config)?);
        }

        let mut wiring = Vec::with_capacity(config.loggers.len());
        for logger_config in &config.loggers {
            let mut appenders = Vec::with_capacity(logger_config.appenders.len());
            for appender_name in &logger_config.appenders {
                let appender = built.get(appender_name.as_str()).ok_or_else(|| {
                    LoggerError::config(
                        format!("logger '{}'", logger_config.name),
                        format!("unknown appender '{}'", appender_name),
                    )
                })?;
                appenders.push(Arc::clone(appender));
            }
            wiring.push((logger_config, appenders));
        }

        for (logger_config, appenders) in wiring {
            let logger = self.get_logger(&logger_config.name);
            logger.set_appenders(appenders);
            logger.set_level(logger_config.level);
        }
        Ok(())
    }

    fn build_appender(config: &AppenderConfig) -> Result<Arc<dyn Appender>> {
        let appender: Arc<dyn Appender> = match config {
            AppenderConfig::Console { colors, .. } => ConsoleAppender::with_colors(*colors).shared(),
            AppenderConfig::File { path, .. } => FileAppender::new(path)?.shared(),
        };
        if let Some(level) = config.level() {
            appender.set_level(level);
        }
        if let Some(pattern) = config.formatter() {
            appender.set_formatter(LogFormatter::new(pattern).shared());
        }
        Ok(appender)
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_get_logger_is_get_or_create() {
        let registry = LoggerRegistry::new();
        let first = registry.get_logger("net");
        let second = registry.get_logger("net");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "net");
        assert_eq!(first.appender_count(), 0);
    }

    #[test]
    fn test_root_by_name() {
        let registry = LoggerRegistry::new();
        assert!(Arc::ptr_eq(&registry.root(), &registry.get_logger("root")));
        assert!(registry.remove("root").is_none());
    }

    #[test]
    fn test_lookup_does_not_create() {
        let registry = LoggerRegistry::new();
        assert!(registry.lookup("ghost").is_none());
        assert_eq!(registry.names(), vec!["root".to_string()]);
    }

    #[test]
    fn test_remove_and_recreate() {
        let registry = LoggerRegistry::new();
        let old = registry.get_logger("jobs");
        old.set_level(LogLevel::Error);

        let removed = registry.remove("jobs").expect("logger was registered");
        assert!(Arc::ptr_eq(&old, &removed));

        let fresh = registry.get_logger("jobs");
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert_eq!(fresh.level(), LogLevel::Debug);
    }

    #[test]
    fn test_names_sorted_with_root_first() {
        let registry = LoggerRegistry::new();
        registry.get_logger("zeta");
        registry.get_logger("alpha");
        assert_eq!(registry.names(), vec!["root", "alpha", "zeta"]);
    }

    #[test]
    fn test_console_root() {
        let registry = LoggerRegistry::with_console_root();
        assert_eq!(registry.root().appender_count(), 1);
        assert_eq!(LoggerRegistry::global().root().name(), "root");
    }
}
