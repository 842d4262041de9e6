//! Built-in `format` checkers (spec §4.2): `uri`, `uri-reference`,
//! `date-time`, `date`, `time`, `email`, `color-hex`, `ipv4`, `ipv6`.
//! Everything else is not a built-in and is treated as passing, per spec §1
//! ("executing `format` validators beyond the built-in short list" is a
//! non-goal).
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use url::Url;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Is a valid regex");
    static ref COLOR_HEX_RE: Regex =
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Is a valid regex");
    static ref TIME_RE: Regex = Regex::new(
        r"^([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?(([Zz])|([+-]([01][0-9]|2[0-3]):[0-5][0-9]))$"
    ).expect("Is a valid regex");
    static ref REFERENCE_BASE: Url = Url::parse("json-schema:///").expect("Is a valid URL");
}

pub const BUILTIN_FORMATS: &[&str] = &[
    "uri",
    "uri-reference",
    "date-time",
    "date",
    "time",
    "email",
    "color-hex",
    "ipv4",
    "ipv6",
];

/// Returns `true` when `value` satisfies `format`. Unknown format names are
/// not validated here (they pass), matching the "short list" scope of §1.
pub fn check(format: &str, value: &str) -> bool {
    match format {
        "uri" => Url::from_str(value)
            .map(|u| !u.scheme().is_empty())
            .unwrap_or(false),
        "uri-reference" => {
            Url::from_str(value).is_ok() || Url::options().base_url(Some(&REFERENCE_BASE)).parse(value).is_ok()
        }
        "date-time" => DateTime::parse_from_rfc3339(value).is_ok(),
        "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        "time" => TIME_RE.is_match(value),
        "email" => EMAIL_RE.is_match(value),
        "color-hex" => COLOR_HEX_RE.is_match(value),
        "ipv4" => value.parse::<Ipv4Addr>().is_ok(),
        "ipv6" => value.parse::<Ipv6Addr>().is_ok(),
        _ => true,
    }
}

pub fn is_builtin(format: &str) -> bool {
    BUILTIN_FORMATS.contains(&format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("uri", "https://example.com", true)]
    #[test_case("uri", "/relative/path", false)]
    #[test_case("uri-reference", "/relative/path", true)]
    #[test_case("date-time", "2020-01-01T00:00:00Z", true)]
    #[test_case("date-time", "2020-01-01", false)]
    #[test_case("date", "2020-01-01", true)]
    #[test_case("date", "not-a-date", false)]
    #[test_case("time", "12:30:00Z", true)]
    #[test_case("time", "noon", false)]
    #[test_case("email", "a@b.com", true)]
    #[test_case("email", "not-an-email", false)]
    #[test_case("color-hex", "#abc123", true)]
    #[test_case("color-hex", "abc123", false)]
    #[test_case("ipv4", "127.0.0.1", true)]
    #[test_case("ipv4", "2001:0db8::1", false)]
    #[test_case("ipv6", "2001:0db8::1", true)]
    #[test_case("unknown-custom-format", "anything", true)]
    fn checks_builtin_formats(format: &str, value: &str, expected: bool) {
        assert_eq!(check(format, value), expected);
    }
}
