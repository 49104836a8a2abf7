//! Pattern-driven log formatter
//!
//! A pattern is a sequence of literal text and `%` placeholders:
//!
//! | token | renders |
//! |-------|---------|
//! | `%m` | message |
//! | `%p` | level name |
//! | `%r` | milliseconds since process start |
//! | `%t` | thread id |
//! | `%N` | thread name (empty if unnamed) |
//! | `%F` | fiber id |
//! | `%d` / `%d{fmt}` | timestamp, see [`TimestampFormat::from_argument`] |
//! | `%f` | source file (empty if unknown) |
//! | `%l` | source line (empty if unknown) |
//! | `%n` | newline |
//! | `%T` | tab |
//! | `%%` | a literal `%` |
//!
//! Parsing is lenient. Unknown tokens are kept as literal text, a trailing
//! `%` is literal, and an unterminated `{` is not treated as an argument.

use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::{Arc, OnceLock};

/// Pattern used by [`LogFormatter::default`]
pub const DEFAULT_PATTERN: &str = "%d{%Y-%m-%d %H:%M:%S}%T%t%T%F%T[%p]%T%f:%l%T%m%n";

static SHARED_DEFAULT: OnceLock<Arc<LogFormatter>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormatItem {
    Literal(String),
    Message,
    Level,
    Elapsed,
    ThreadId,
    ThreadName,
    FiberId,
    DateTime(TimestampFormat),
    File,
    Line,
    NewLine,
    Tab,
}

/// Compiled log pattern.
///
/// Formatting is a pure function of the pattern, the level and the event:
/// the same inputs always produce the same text, so one formatter can be
/// shared by any number of appenders.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
///
/// let formatter = LogFormatter::new("[%p] %m");
/// let event = LogEvent::new("disk almost full");
/// assert_eq!(formatter.format(LogLevel::Warn, &event), "[WARN] disk almost full");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LogFormatter {
    pattern: String,
    items: Vec<FormatItem>,
}

impl LogFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let items = Self::compile(&pattern);
        Self { pattern, items }
    }

    /// Process-wide default formatter, built on first use
    pub fn shared_default() -> Arc<LogFormatter> {
        Arc::clone(SHARED_DEFAULT.get_or_init(|| Arc::new(LogFormatter::default())))
    }

    /// Wrap this formatter in an Arc for sharing across appenders
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, level: LogLevel, event: &LogEvent) -> String {
        let mut output = String::with_capacity(self.pattern.len() + event.message().len() + 32);
        self.format_into(level, event, &mut output);
        output
    }

    /// Append the rendered event to `output`
    pub fn format_into(&self, level: LogLevel, event: &LogEvent, output: &mut String) {
        for item in &self.items {
            match item {
                FormatItem::Literal(text) => output.push_str(text),
                FormatItem::Message => output.push_str(event.message()),
                FormatItem::Level => output.push_str(level.to_str()),
                FormatItem::Elapsed => output.push_str(&event.elapsed_ms().to_string()),
                FormatItem::ThreadId => output.push_str(&event.thread_id().to_string()),
                FormatItem::ThreadName => output.push_str(event.thread_name().unwrap_or_default()),
                FormatItem::FiberId => output.push_str(&event.fiber_id().to_string()),
                FormatItem::DateTime(format) => output.push_str(&format.format(event.timestamp())),
                FormatItem::File => output.push_str(event.file().unwrap_or_default()),
                FormatItem::Line => {
                    if event.line() != 0 {
                        output.push_str(&event.line().to_string());
                    }
                }
                FormatItem::NewLine => output.push('\n'),
                FormatItem::Tab => output.push('\t'),
            }
        }
    }

    fn compile(pattern: &str) -> Vec<FormatItem> {
        let mut items = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let Some(token) = chars.next() else {
                literal.push('%');
                break;
            };
            if token == '%' {
                literal.push('%');
                continue;
            }

            let argument = Self::take_argument(&mut chars);
            let item = match token {
                'm' => FormatItem::Message,
                'p' => FormatItem::Level,
                'r' => FormatItem::Elapsed,
                't' => FormatItem::ThreadId,
                'N' => FormatItem::ThreadName,
                'F' => FormatItem::FiberId,
                'd' => FormatItem::DateTime(TimestampFormat::from_argument(
                    argument.as_deref().unwrap_or_default(),
                )),
                'f' => FormatItem::File,
                'l' => FormatItem::Line,
                'n' => FormatItem::NewLine,
                'T' => FormatItem::Tab,
                _ => {
                    literal.push('%');
                    literal.push(token);
                    if let Some(argument) = argument {
                        literal.push('{');
                        literal.push_str(&argument);
                        literal.push('}');
                    }
                    continue;
                }
            };

            if !literal.is_empty() {
                items.push(FormatItem::Literal(std::mem::take(&mut literal)));
            }
            items.push(item);
        }

        if !literal.is_empty() {
            items.push(FormatItem::Literal(literal));
        }
        items
    }

    /// Consume a `{...}` argument following a token, if one is terminated.
    fn take_argument(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
        if chars.peek() != Some(&'{') {
            return None;
        }

        let mut probe = chars.clone();
        probe.next();
        let mut argument = String::new();
        for c in probe.by_ref() {
            if c == '}' {
                *chars = probe;
                return Some(argument);
            }
            argument.push(c);
        }
        None
    }
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl fmt::Debug for LogFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFormatter")
            .field("pattern", &self.pattern)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn fixed_event() -> LogEvent {
        let at = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        LogEvent::new("request served")
            .with_location("src/server.rs", 88)
            .with_timestamp(at)
            .with_elapsed_ms(1500)
            .with_fiber_id(4)
    }

    #[test]
    fn test_all_placeholders() {
        let event = fixed_event();
        let formatter = LogFormatter::new("%d|%p|%r|%F|%f:%l|%m%T%n");
        assert_eq!(
            formatter.format(LogLevel::Info, &event),
            "2025-01-08 10:30:45|INFO|1500|4|src/server.rs:88|request served\t\n"
        );
    }

    #[test]
    fn test_thread_id_placeholder() {
        let event = fixed_event();
        let formatter = LogFormatter::new("%t");
        assert_eq!(
            formatter.format(LogLevel::Info, &event),
            event.thread_id().to_string()
        );
    }

    #[test]
    fn test_date_argument() {
        let event = fixed_event();
        assert_eq!(
            LogFormatter::new("%d{%H:%M}").format(LogLevel::Debug, &event),
            "10:30"
        );
        assert_eq!(
            LogFormatter::new("%d{unix}").format(LogLevel::Debug, &event),
            "1736332245"
        );
    }

    #[test]
    fn test_unknown_token_is_literal() {
        let event = fixed_event();
        let formatter = LogFormatter::new("%q %m %z{arg}");
        assert_eq!(
            formatter.format(LogLevel::Warn, &event),
            "%q request served %z{arg}"
        );
    }

    #[test]
    fn test_escaped_and_trailing_percent() {
        let event = fixed_event();
        assert_eq!(
            LogFormatter::new("100%% %m %").format(LogLevel::Warn, &event),
            "100% request served %"
        );
    }

    #[test]
    fn test_unterminated_argument_stays_literal() {
        let event = fixed_event();
        let formatter = LogFormatter::new("%d{%Y %m");
        assert_eq!(
            formatter.format(LogLevel::Error, &event),
            "2025-01-08 10:30:45{%Y request served"
        );
    }

    #[test]
    fn test_missing_location_renders_empty() {
        let event = LogEvent::new("no location");
        let formatter = LogFormatter::default();
        let output = formatter.format(LogLevel::Info, &event);

        assert!(output.contains("[INFO]\t:\tno location\n"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let event = fixed_event();
        let formatter = LogFormatter::default();
        let first = formatter.format(LogLevel::Fatal, &event);
        let second = formatter.format(LogLevel::Fatal, &event);
        assert_eq!(first, second);
    }

    #[test]
    fn test_shared_default_is_singleton() {
        let a = LogFormatter::shared_default();
        let b = LogFormatter::shared_default();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.pattern(), DEFAULT_PATTERN);
    }

    #[test]
    fn test_unrenderable_date_argument_falls_back() {
        let event = fixed_event();
        let formatter = LogFormatter::new("%d{%#z} %m");
        assert_eq!(
            formatter.format(LogLevel::Info, &event),
            "2025-01-08 10:30:45 request served"
        );
    }

    #[test]
    fn test_thread_name_placeholder() {
        let named = std::thread::Builder::new()
            .name("worker-7".to_string())
            .spawn(|| LogEvent::new("named"))
            .expect("spawn named thread")
            .join()
            .expect("named thread panicked");
        assert_eq!(LogFormatter::new("[%N]").format(LogLevel::Info, &named), "[worker-7]");

        let unnamed = std::thread::spawn(|| LogEvent::new("unnamed"))
            .join()
            .expect("unnamed thread panicked");
        assert_eq!(LogFormatter::new("[%N]").format(LogLevel::Info, &unnamed), "[]");
    }
}
