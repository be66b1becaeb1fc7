//! Pluggable `format` enforcement.
//!
//! The validator always records the `format` of every node it reaches; it
//! only rejects strings when a [`FormatChecker`] is installed with
//! [`Validator::with_format_checker`](crate::Validator::with_format_checker).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

/// Decides whether a string conforms to a named format.
pub trait FormatChecker: Send + Sync {
    /// `None` when the format is unknown to this checker, which leaves the
    /// value unchecked.
    fn check(&self, format: &str, value: &str) -> Option<bool>;
}

/// Checks for `date`, `time`, `date-time` (RFC 3339) and `email`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormats;

impl FormatChecker for BuiltinFormats {
    fn check(&self, format: &str, value: &str) -> Option<bool> {
        match format {
            "date" => Some(is_date(value)),
            "time" => Some(is_time(value)),
            "date-time" => Some(DateTime::parse_from_rfc3339(value).is_ok()),
            "email" => Some(EMAIL_RE.is_match(value)),
            _ => None,
        }
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("static regex must compile")
});

/// `yyyy-mm-dd`, four-digit year.
fn is_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// RFC 3339 `full-time`: `hh:mm:ss[.frac]` followed by `Z` or `±hh:mm`.
fn is_time(text: &str) -> bool {
    DateTime::parse_from_rfc3339(&format!("1970-01-01T{text}")).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates() {
        let formats = BuiltinFormats;
        assert_eq!(formats.check("date", "2024-02-29"), Some(true));
        assert_eq!(formats.check("date", "2023-02-29"), Some(false));
        assert_eq!(formats.check("date", "2024-13-01"), Some(false));
        assert_eq!(formats.check("date", "24-01-01"), Some(false));
        assert_eq!(formats.check("date", "2024-1-015"), Some(false));
    }

    #[test]
    fn test_date_times() {
        let formats = BuiltinFormats;
        assert_eq!(formats.check("date-time", "2024-05-01T12:30:00Z"), Some(true));
        assert_eq!(
            formats.check("date-time", "2024-05-01T12:30:00.250+02:00"),
            Some(true)
        );
        assert_eq!(formats.check("date-time", "2024-05-01X12:30:00Z"), Some(false));
        assert_eq!(formats.check("date-time", "2024-02-30T12:30:00Z"), Some(false));
        assert_eq!(formats.check("time", "25:00:00Z"), Some(false));
        assert_eq!(formats.check("time", "12:00:00"), Some(false));
    }

    #[test]
    fn test_emails() {
        let formats = BuiltinFormats;
        assert_eq!(formats.check("email", "alice@example.com"), Some(true));
        assert_eq!(formats.check("email", "alice@example"), Some(false));
        assert_eq!(formats.check("email", "@example.com"), Some(false));
        assert_eq!(formats.check("email", "a b@example.com"), Some(false));
    }

    #[test]
    fn test_unknown_format_is_unchecked() {
        assert_eq!(BuiltinFormats.check("color", "red"), None);
    }
}
