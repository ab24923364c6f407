//! Weekend and night entry detection.
//!
//! Both checks rebuild an entry timestamp from the `Entered_Date` and
//! `Entered_Time` text and parse it with a caller-supplied format. Lines that
//! do not parse are excluded from both checks.

use crate::datetime::parse_entry_timestamp;
use crate::error::Result;
use crate::finding::{CheckName, Finding};
use crate::ledger::{DerivedLedger, JournalId, LedgerEntry};
use crate::schema::Field;
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::debug;
use serde::Serialize;

/// First ISO weekday counted as weekend (Saturday).
pub const WEEKEND_FROM_ISO_DAY: u32 = 6;

/// Entries at or after this hour count as night entries.
pub const NIGHT_FROM_HOUR: u32 = 20;

/// Entries at or before this hour count as night entries.
pub const NIGHT_UNTIL_HOUR: u32 = 5;

const REQUIRED: &[Field] = &[Field::JournalId, Field::EnteredDate, Field::EnteredTime];

/// A line entered on a Saturday or Sunday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekendEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: Option<JournalId>,
    #[serde(rename = "Entered_Date")]
    pub entered_date: Option<String>,
    #[serde(rename = "Entered_Time")]
    pub entered_time: Option<String>,
    #[serde(rename = "Entry_Date_Time_Formatted")]
    pub timestamp: NaiveDateTime,
    /// ISO weekday, Monday = 1.
    #[serde(rename = "WeekDayNo")]
    pub weekday: u32,
}

/// A line entered between 20:00 and 05:59.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: Option<JournalId>,
    #[serde(rename = "Entered_Date")]
    pub entered_date: Option<String>,
    #[serde(rename = "Entered_Time")]
    pub entered_time: Option<String>,
    #[serde(rename = "Entry_Date_Time_Formatted")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Hour")]
    pub hour: u32,
}

fn timestamps<'a>(
    ledger: &'a DerivedLedger,
    format: &'a str,
) -> impl Iterator<Item = (&'a LedgerEntry, NaiveDateTime)> + 'a {
    ledger.entries().iter().filter_map(move |entry| {
        match parse_entry_timestamp(
            entry.entered_date.as_deref(),
            entry.entered_time.as_deref(),
            format,
        ) {
            Ok(ts) => Some((entry, ts)),
            Err(e) => {
                debug!("Row {}: {}", entry.row, e);
                None
            }
        }
    })
}

/// Flags lines whose entry timestamp falls on a weekend.
pub fn weekend_entries(ledger: &DerivedLedger, format: &str) -> Result<Finding<WeekendEntry>> {
    ledger.require(CheckName::WeekendEntries.section(), REQUIRED)?;

    let flagged = timestamps(ledger, format)
        .filter_map(|(entry, timestamp)| {
            let weekday = timestamp.weekday().number_from_monday();
            (weekday >= WEEKEND_FROM_ISO_DAY).then(|| WeekendEntry {
                journal_id: entry.journal_id.clone(),
                entered_date: entry.entered_date.clone(),
                entered_time: entry.entered_time.clone(),
                timestamp,
                weekday,
            })
        })
        .collect();

    Ok(Finding::new(flagged))
}

/// Flags lines entered at hour 20 or later, or at hour 5 or earlier.
pub fn night_entries(ledger: &DerivedLedger, format: &str) -> Result<Finding<NightEntry>> {
    ledger.require(CheckName::NightEntries.section(), REQUIRED)?;

    let flagged = timestamps(ledger, format)
        .filter_map(|(entry, timestamp)| {
            let hour = timestamp.hour();
            (hour >= NIGHT_FROM_HOUR || hour <= NIGHT_UNTIL_HOUR).then(|| NightEntry {
                journal_id: entry.journal_id.clone(),
                entered_date: entry.entered_date.clone(),
                entered_time: entry.entered_time.clone(),
                timestamp,
                hour,
            })
        })
        .collect();

    Ok(Finding::new(flagged))
}
