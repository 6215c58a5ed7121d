//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A publish date split for display
///
/// `day` and `month` feed the date badge on post cards, `full` is the
/// long form shown on the slider and post pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateParts {
    /// Zero-padded day of month ("05")
    pub day: String,
    /// Abbreviated month name ("Jan")
    pub month: String,
    /// Long form ("January 05, 2024")
    pub full: String,
}

/// Parse a WordPress date
///
/// WordPress sends site-local timestamps without an offset
/// (`2024-01-15T10:30:00`); RFC 3339 and bare dates are accepted too.
pub fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();

    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|d| d.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a WordPress date into its display parts
///
/// # Examples
/// ```ignore
/// format_date("2024-01-05T10:30:00").full // -> "January 05, 2024"
/// ```
pub fn format_date(date: &str) -> DateParts {
    match parse_date(date) {
        Some(parsed) => DateParts {
            day: parsed.format("%d").to_string(),
            month: parsed.format("%b").to_string(),
            full: full_date(&parsed),
        },
        None => {
            tracing::debug!("Unparseable date: {:?}", date);
            DateParts {
                day: String::new(),
                month: String::new(),
                full: date.to_string(),
            }
        }
    }
}

/// Format date in full format (like "January 01, 2024")
pub fn full_date(date: &NaiveDateTime) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Format a date for a `datetime` attribute
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}
