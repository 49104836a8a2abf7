//! Timestamp formatting used by the `%d` pattern placeholder
//!
//! Supports ISO 8601, RFC 3339, Unix timestamps, and strftime formats.
//! A strftime string that chrono cannot parse or cannot render is replaced
//! by [`DEFAULT_DATE_PATTERN`] when the format is built, and rendering
//! falls back to it again if a hand-built variant fails.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// strftime pattern used when `%d` carries no argument
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp rendering options
///
/// # Examples
///
/// ```
/// use rust_log_pipeline::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::default().format(&at), "2025-01-08 10:30:45");
/// assert_eq!(TimestampFormat::from_argument("unix").format(&at), "1736332245");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// strftime format, validated on construction
    Custom(String),
}

impl Default for TimestampFormat {
    fn default() -> Self {
        TimestampFormat::Custom(DEFAULT_DATE_PATTERN.to_string())
    }
}

impl TimestampFormat {
    /// Build a strftime format, falling back to the default pattern when
    /// `format_str` contains specifiers chrono cannot render.
    #[must_use]
    pub fn custom(format_str: &str) -> Self {
        if Self::is_valid_strftime(format_str) {
            TimestampFormat::Custom(format_str.to_string())
        } else {
            TimestampFormat::default()
        }
    }

    /// Resolve the argument of a `%d{...}` placeholder.
    ///
    /// Named formats are matched case-insensitively; anything else is
    /// treated as a strftime string. An empty argument selects the default.
    #[must_use]
    pub fn from_argument(argument: &str) -> Self {
        match argument.trim().to_ascii_lowercase().as_str() {
            "" => TimestampFormat::default(),
            "iso8601" => TimestampFormat::Iso8601,
            "rfc3339" => TimestampFormat::Rfc3339,
            "unix" => TimestampFormat::Unix,
            "unix_millis" => TimestampFormat::UnixMillis,
            _ => Self::custom(argument),
        }
    }

    fn is_valid_strftime(format_str: &str) -> bool {
        Self::try_render(&DateTime::<Utc>::default(), format_str).is_some()
    }

    /// Parse errors show up as `Item::Error`; some specifiers (`%#z`) parse
    /// but fail when rendered, so rendering goes through `write!`.
    fn try_render(datetime: &DateTime<Utc>, format_str: &str) -> Option<String> {
        if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
            return None;
        }
        let mut out = String::new();
        write!(out, "{}", datetime.format(format_str)).ok()?;
        Some(out)
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => Self::try_render(datetime, format_str)
                .unwrap_or_else(|| datetime.format(DEFAULT_DATE_PATTERN).to_string()),
        }
    }
}
