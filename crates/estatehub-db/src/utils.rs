//! Shared utility functions

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Parse a datetime string (RFC3339 format) or return current time
///
/// This helper is used throughout the database layer to handle datetime parsing
/// with a fallback to the current time if parsing fails.
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Format a timestamp for storage.
///
/// Fixed microsecond precision keeps the stored strings lexicographically
/// ordered, which `ORDER BY created_at` relies on.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time at the precision timestamps are stored with, so records
/// returned from an insert compare equal to the same records read back.
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Escape `LIKE` wildcards so user input is matched literally.
///
/// The escape character is `\`; queries using the result must declare
/// `ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_or_now() {
        let valid_time = "2024-01-01T12:00:00Z";
        let parsed = parse_datetime_or_now(valid_time);
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");

        // Invalid time should return current time (just check it doesn't panic)
        let now_before = Utc::now();
        let parsed = parse_datetime_or_now("invalid");
        let now_after = Utc::now();
        assert!(parsed >= now_before && parsed <= now_after);
    }

    #[test]
    fn test_format_datetime_sorts_lexicographically() {
        let earlier = parse_datetime_or_now("2024-01-01T12:00:00Z");
        let later = parse_datetime_or_now("2024-01-01T12:00:00.5Z");

        let a = format_datetime(&earlier);
        let b = format_datetime(&later);
        assert_eq!(a, "2024-01-01T12:00:00.000000Z");
        assert!(a < b);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("villa"), "villa");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
