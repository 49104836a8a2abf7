//! Declarative logger configuration
//!
//! A [`LoggingConfig`] names a set of appenders and the loggers that use
//! them. It is plain serde data: the host application decides where the
//! text comes from, parses it (JSON via [`LoggingConfig::from_json`]) and
//! hands it to [`LoggerRegistry::apply_config`](super::LoggerRegistry::apply_config).
//!
//! ```
//! use rust_log_pipeline::prelude::*;
//!
//! let config = LoggingConfig::from_json(r#"{
//!     "appenders": {
//!         "stdout": { "type": "console", "level": "WARN", "formatter": "%p %m%n" }
//!     },
//!     "loggers": [
//!         { "name": "root", "level": "INFO", "appenders": ["stdout"] },
//!         { "name": "db", "level": "DEBUG", "appenders": ["stdout"] }
//!     ]
//! }"#).unwrap();
//!
//! let registry = LoggerRegistry::new();
//! registry.apply_config(&config).unwrap();
//! assert_eq!(registry.get_logger("db").appender_count(), 1);
//! ```

use super::error::Result;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub appenders: BTreeMap<String, AppenderConfig>,
    #[serde(default)]
    pub loggers: Vec<LoggerConfig>,
}

impl LoggingConfig {
    /// Parse a configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonError`](super::LoggerError::JsonError) for
    /// malformed JSON, unknown appender types or invalid level names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Formatters belong to appenders, so a logger entry carrying a
/// `formatter` key is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    pub name: String,
    #[serde(default = "default_logger_level")]
    pub level: LogLevel,
    /// Names of entries in [`LoggingConfig::appenders`], in dispatch order
    #[serde(default)]
    pub appenders: Vec<String>,
}

fn default_logger_level() -> LogLevel {
    LogLevel::Debug
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AppenderConfig {
    Console {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<LogLevel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formatter: Option<String>,
        #[serde(default)]
        colors: bool,
    },
    File {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<LogLevel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formatter: Option<String>,
    },
}

impl AppenderConfig {
    pub fn level(&self) -> Option<LogLevel> {
        match self {
            AppenderConfig::Console { level, .. } | AppenderConfig::File { level, .. } => *level,
        }
    }

    pub fn formatter(&self) -> Option<&str> {
        match self {
            AppenderConfig::Console { formatter, .. } | AppenderConfig::File { formatter, .. } => {
                formatter.as_deref()
            }
        }
    }
}
