//! # Rust Log Pipeline
//!
//! A synchronous, level-filtered logging core: events are captured once,
//! routed through named loggers, and fanned out to shared appenders that
//! each apply their own threshold and pattern formatter.
//!
//! ## Features
//!
//! - **Two-stage filtering**: a logger threshold, then a threshold per appender
//! - **Shared appenders**: one `Arc<dyn Appender>` can serve many loggers
//! - **Pattern formatting**: `%d`, `%p`, `%m`, `%f:%l`, ... with lenient parsing
//! - **Failure isolation**: one failing sink never blocks the others
//!
//! ```
//! use rust_log_pipeline::prelude::*;
//!
//! let logger = Logger::builder("root")
//!     .min_level(LogLevel::Info)
//!     .appender(ConsoleAppender::new().with_level(LogLevel::Warn).shared())
//!     .build();
//!
//! logger.error(&LogEvent::new("disk full").with_location(file!(), line!()));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::core::{
        Appender, AppenderConfig, AppenderCore, ErrorCallback, LogEvent, LogFormatter, LogLevel,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerRegistry,
        LoggingConfig, Result, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, FileAppender};
pub use self::core::{
    process, Appender, AppenderConfig, AppenderCore, ErrorCallback, FiberGuard, LogEvent,
    LogFormatter, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    LoggerRegistry, LoggingConfig, Result, TimestampFormat, DEFAULT_PATTERN, ROOT_LOGGER_NAME,
};
