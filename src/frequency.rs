//! Rare-user and rare-account detection by entry count.

use crate::error::Result;
use crate::finding::{CheckName, Finding};
use crate::ledger::{DerivedLedger, JournalId, LedgerEntry};
use crate::schema::Field;
use serde::Serialize;
use std::collections::BTreeMap;

/// Users with at most this many lines are flagged.
pub const RARE_USER_MAX_ENTRIES: usize = 10;

/// Accounts with at most this many lines are flagged.
pub const RARE_ACCOUNT_MAX_ENTRIES: usize = 3;

const REQUIRED: &[Field] = &[Field::JournalId, Field::Account, Field::EnteredBy];

/// A line posted by a rarely seen user or to a rarely used account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RareEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: Option<JournalId>,
    #[serde(rename = "GL_Account_Number")]
    pub account: Option<String>,
    #[serde(rename = "Entered_By")]
    pub entered_by: Option<String>,
    /// Total lines for the user or account this row was grouped by.
    #[serde(rename = "Entered_Count")]
    pub count: usize,
}

/// Groups lines by `key` and flags all lines of groups with at most `max` members.
fn rare_by<'a>(
    ledger: &'a DerivedLedger,
    max: usize,
    key: impl Fn(&'a LedgerEntry) -> Option<&'a str>,
) -> Vec<RareEntry> {
    let mut groups: BTreeMap<&str, Vec<&LedgerEntry>> = BTreeMap::new();
    for entry in ledger.entries() {
        if let Some(k) = key(entry) {
            groups.entry(k).or_default().push(entry);
        }
    }

    groups
        .into_values()
        .filter(|members| members.len() <= max)
        .flat_map(|members| {
            let count = members.len();
            members.into_iter().map(move |entry| RareEntry {
                journal_id: entry.journal_id.clone(),
                account: entry.account.clone(),
                entered_by: entry.entered_by.clone(),
                count,
            })
        })
        .collect()
}

/// Flags every line of users with no more than [`RARE_USER_MAX_ENTRIES`] lines.
pub fn rare_users(ledger: &DerivedLedger) -> Result<Finding<RareEntry>> {
    ledger.require(CheckName::RareUsers.section(), REQUIRED)?;
    Ok(Finding::new(rare_by(ledger, RARE_USER_MAX_ENTRIES, |e| {
        e.entered_by.as_deref()
    })))
}

/// Flags every line of accounts with no more than [`RARE_ACCOUNT_MAX_ENTRIES`] lines.
pub fn rare_accounts(ledger: &DerivedLedger) -> Result<Finding<RareEntry>> {
    ledger.require(CheckName::RareAccounts.section(), REQUIRED)?;
    Ok(Finding::new(rare_by(ledger, RARE_ACCOUNT_MAX_ENTRIES, |e| {
        e.account.as_deref()
    })))
}
