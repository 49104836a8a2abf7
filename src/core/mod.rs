//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod formatter;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod process;
pub mod registry;
pub mod timestamp;

pub use appender::{Appender, AppenderCore};
pub use config::{AppenderConfig, LoggerConfig, LoggingConfig};
pub use error::{LoggerError, Result};
pub use formatter::{LogFormatter, DEFAULT_PATTERN};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::{ErrorCallback, Logger, LoggerBuilder, ROOT_LOGGER_NAME};
pub use metrics::LoggerMetrics;
pub use process::FiberGuard;
pub use registry::LoggerRegistry;
pub use timestamp::{TimestampFormat, DEFAULT_DATE_PATTERN};
