//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// format_date(&date, "MMMM D")     // -> "January 15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format, date.day());
    date.format(&chrono_format).to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Moment.js tokens, longest first within each letter
const TOKENS: [(&str, &str); 19] = [
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%j"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("SSS", "%3f"),
    ("ZZ", "%z"),
];

/// Convert Moment.js format to chrono format.
///
/// Scans left to right so a token already converted is never matched again,
/// e.g. the `M` in `%B` produced by `MMMM`. Text in `[brackets]` is literal.
/// chrono has no ordinal day, so `Do` is resolved against `day` here.
fn moment_to_chrono_format(format: &str, day: u32) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while !rest.is_empty() {
        if let Some(literal) = rest.strip_prefix('[') {
            if let Some(end) = literal.find(']') {
                result.push_str(&literal[..end].replace('%', "%%"));
                rest = &literal[end + 1..];
                continue;
            }
        }

        if let Some(after) = rest.strip_prefix("Do") {
            result.push_str("%-d");
            result.push_str(ordinal_suffix(day));
            rest = after;
            continue;
        }

        for (from, to) in TOKENS {
            if let Some(after) = rest.strip_prefix(from) {
                result.push_str(to);
                rest = after;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                result.push_str("%%");
            } else {
                result.push(c);
            }
        }
        rest = chars.as_str();
    }

    result
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st
fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_format_date() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-05");
        assert_eq!(format_date(&date, "YYYY/MM/DD"), "2024/01/05");
        assert_eq!(format_date(&date, "MMMM D"), "January 5");
        assert_eq!(format_date(&date, "MMM D, YYYY"), "Jan 5, 2024");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD", 1), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss", 1), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("MMMM D", 1), "%B %-d");
        assert_eq!(moment_to_chrono_format("[Posted] D", 1), "Posted %-d");
        assert_eq!(moment_to_chrono_format("100%", 1), "100%%");
    }

    #[test]
    fn test_ordinal_day() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "MMMM Do"), "January 5th");

        let suffixes: Vec<_> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 31]
            .into_iter()
            .map(|d| format!("{}{}", d, ordinal_suffix(d)))
            .collect();
        assert_eq!(
            suffixes,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "31st"]
        );
    }

    #[test]
    fn test_date_xml() {
        let date = Local.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        assert!(date_xml(&date).starts_with("2020-03-01T00:00:00"));
    }
}
