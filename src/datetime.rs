//! Date and time parsing for entry timestamps.

use crate::error::{AuditError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Compact timestamp format, e.g. `20240131` + `101530`.
pub const COMPACT_DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format for ISO dates joined with colon-separated times, e.g. `2024-01-31` + `10:15:30`.
pub const ISO_DATETIME_FORMAT: &str = "%Y-%m-%d%H:%M:%S";

/// Placeholder used when the date part is empty. It never parses.
pub const NULL_DATE: &str = "0000-00-00";

/// Placeholder used when the time part is empty.
pub const NULL_TIME: &str = "00:00:00";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// How a date column is encoded in the extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEncoding {
    /// Calendar dates; offsets are in days.
    Calendar,
    /// Plain numbers (e.g. `20240131` or spreadsheet serials); offsets are
    /// added to the number itself.
    Numeric,
}

impl DateEncoding {
    /// Numeric when every non-empty value is a number, calendar otherwise.
    pub fn detect<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen = false;
        for value in values {
            seen = true;
            if Decimal::from_str(value.trim()).is_err() {
                return DateEncoding::Calendar;
            }
        }
        if seen {
            DateEncoding::Numeric
        } else {
            DateEncoding::Calendar
        }
    }
}

/// Parses a calendar date in one of the common extract layouts.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .map(|dt| dt.date())
        })
}

/// Joins a date and a time cell as text and parses the result with `format`.
///
/// Empty parts are replaced by [`NULL_DATE`] and [`NULL_TIME`] first.
pub fn parse_entry_timestamp(
    date: Option<&str>,
    time: Option<&str>,
    format: &str,
) -> Result<NaiveDateTime> {
    let joined = format!(
        "{}{}",
        date.map(str::trim).unwrap_or(NULL_DATE),
        time.map(str::trim).unwrap_or(NULL_TIME)
    );
    NaiveDateTime::parse_from_str(&joined, format).map_err(|_| AuditError::DateTimeParse {
        input: joined,
        format: format.to_string(),
    })
}
