//! Anchored regexes for the `format` schema keyword and for
//! format detection during schema inference. Shared so the two
//! callers agree on exactly what "looks like an email" means.

use regex::Regex;
use std::sync::OnceLock;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).unwrap())
        }
    };
}

lazy_regex!(date_time_re, r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$");
lazy_regex!(date_re, r"^\d{4}-\d{2}-\d{2}$");
lazy_regex!(time_re, r"^\d{2}:\d{2}:\d{2}(\.\d+)?$");
lazy_regex!(email_re, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
lazy_regex!(uri_re, r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$");
lazy_regex!(uuid_re, r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$");
lazy_regex!(
    ipv4_re,
    r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)){3}$"
);
lazy_regex!(
    hostname_re,
    r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
);

/// `true` if `value` matches the named `format` keyword. Unknown format names
/// are always considered a match (unknown formats are ignored).
pub fn matches_format(format: &str, value: &str) -> bool {
    match format {
        "date-time" => date_time_re().is_match(value),
        "date" => date_re().is_match(value),
        "time" => time_re().is_match(value),
        "email" => email_re().is_match(value),
        "uri" => uri_re().is_match(value),
        "uuid" => uuid_re().is_match(value),
        "ipv4" => ipv4_re().is_match(value),
        "hostname" => hostname_re().is_match(value),
        _ => true,
    }
}

/// Detect the most specific format name that `value` matches, for schema
/// inference. Checked most-specific first so e.g. a date-time isn't
/// reported merely as a date.
type FormatCheck = (&'static str, fn() -> &'static Regex);

pub fn detect_format(value: &str) -> Option<&'static str> {
    let order: &[FormatCheck] = &[
        ("date-time", date_time_re),
        ("date", date_re),
        ("time", time_re),
        ("email", email_re),
        ("uuid", uuid_re),
        ("ipv4", ipv4_re),
        ("uri", uri_re),
        ("hostname", hostname_re),
    ];
    order.iter().find(|(_, re)| re().is_match(value)).map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_well_known_formats() {
        assert!(matches_format("email", "a@b.com"));
        assert!(!matches_format("email", "not-an-email"));
        assert!(matches_format("uuid", "550e8400-e29b-41d4-a716-446655440000"));
        assert!(matches_format("date-time", "2024-01-02T03:04:05Z"));
    }

    #[test]
    fn unknown_format_always_matches() {
        assert!(matches_format("made-up-format", "anything"));
    }

    #[test]
    fn detect_prefers_most_specific_match() {
        assert_eq!(detect_format("2024-01-02T03:04:05Z"), Some("date-time"));
        assert_eq!(detect_format("2024-01-02"), Some("date"));
        assert_eq!(detect_format("hello world"), None);
    }
}
