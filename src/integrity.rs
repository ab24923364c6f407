//! Journal integrity checks: completeness, duplicates, round amounts and
//! late postings.

use crate::amount::Amount;
use crate::datetime::{parse_calendar_date, DateEncoding};
use crate::error::{AuditError, Result};
use crate::finding::{CheckName, Finding};
use crate::ledger::{DerivedLedger, JournalId, LedgerEntry};
use crate::schema::Field;
use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Round-amount divisor.
pub const ROUND_AMOUNT_UNIT: i64 = 1000;

/// Days (raw units for numeric dates) a document date may run ahead of its entry date.
pub const LATE_POSTING_OFFSET: i64 = 100;

/// Which amount column an integrity check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AmountBasis {
    /// The derived signed amount.
    Net,
    /// The amount as found in the extract.
    Amount,
}

impl AmountBasis {
    pub fn field(&self) -> Field {
        match self {
            AmountBasis::Net => Field::Net,
            AmountBasis::Amount => Field::Amount,
        }
    }

    pub fn value(&self, entry: &LedgerEntry) -> Option<Amount> {
        match self {
            AmountBasis::Net => entry.net,
            AmountBasis::Amount => entry.amount,
        }
    }
}

/// A journal whose lines do not net to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncompleteEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: JournalId,
    /// Sum of the journal's lines, rounded to two places.
    #[serde(rename = "Residual")]
    pub residual: Amount,
    #[serde(rename = "Basis")]
    pub basis: AmountBasis,
}

/// A journal line whose (account, period, amount) combination repeats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: Option<JournalId>,
    #[serde(rename = "GL_Account_Number")]
    pub account: String,
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Amount")]
    pub amount: Amount,
    #[serde(rename = "Basis")]
    pub basis: AmountBasis,
    #[serde(rename = "Journal_Entry_Count")]
    pub count: usize,
}

/// A journal line whose amount is a whole multiple of a thousand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundAmountEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: Option<JournalId>,
    #[serde(rename = "GL_Account_Number")]
    pub account: Option<String>,
    #[serde(rename = "Period")]
    pub period: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Amount,
    #[serde(rename = "Basis")]
    pub basis: AmountBasis,
}

/// A journal line whose document date lies well after its entry date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatePostingEntry {
    #[serde(rename = "Journal_ID")]
    pub journal_id: Option<JournalId>,
    #[serde(rename = "Document_Date")]
    pub document_date: String,
    #[serde(rename = "Entered_Date")]
    pub entered_date: String,
    #[serde(rename = "Period")]
    pub period: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Option<Amount>,
    #[serde(rename = "Basis")]
    pub basis: AmountBasis,
}

/// Flags journals whose lines, summed and rounded to two places, are not zero.
pub fn incomplete_entries(
    ledger: &DerivedLedger,
    basis: AmountBasis,
) -> Result<Finding<IncompleteEntry>> {
    ledger.require(
        CheckName::IncompleteEntries.section(),
        &[Field::JournalId, basis.field()],
    )?;

    let mut sums: BTreeMap<&JournalId, Amount> = BTreeMap::new();
    for entry in ledger.entries() {
        if let Some(id) = &entry.journal_id {
            let sum = sums.entry(id).or_default();
            *sum = sum
                .checked_add(basis.value(entry).unwrap_or(Amount::ZERO))
                .ok_or_else(|| AuditError::AmountOverflow {
                    check: CheckName::IncompleteEntries.section(),
                    journal: id.to_string(),
                })?;
        }
    }

    let flagged = sums
        .into_iter()
        .filter_map(|(id, sum)| {
            let residual = sum.round2();
            (!residual.is_zero()).then(|| IncompleteEntry {
                journal_id: id.clone(),
                residual,
                basis,
            })
        })
        .collect();

    Ok(Finding::new(flagged))
}

/// Flags every line sharing its (account, period, amount) with another line.
///
/// Lines are listed group by group; each carries the size of its group.
pub fn duplicate_entries(
    ledger: &DerivedLedger,
    basis: AmountBasis,
) -> Result<Finding<DuplicateEntry>> {
    ledger.require(
        CheckName::Duplicates.section(),
        &[Field::JournalId, Field::Account, Field::Period, basis.field()],
    )?;

    let mut groups: BTreeMap<(&str, &str, Amount), Vec<&LedgerEntry>> = BTreeMap::new();
    for entry in ledger.entries() {
        if let (Some(account), Some(period), Some(amount)) =
            (&entry.account, &entry.period, basis.value(entry))
        {
            groups
                .entry((account.as_str(), period.as_str(), amount))
                .or_default()
                .push(entry);
        }
    }

    let mut flagged = Vec::new();
    for ((account, period, amount), members) in groups {
        let count = members.len();
        if count == 1 {
            continue;
        }
        for entry in members {
            flagged.push(DuplicateEntry {
                journal_id: entry.journal_id.clone(),
                account: account.to_string(),
                period: period.to_string(),
                amount,
                basis,
                count,
            });
        }
    }

    Ok(Finding::new(flagged))
}

/// Flags lines whose amount is an exact multiple of [`ROUND_AMOUNT_UNIT`], either sign.
pub fn round_amount_entries(
    ledger: &DerivedLedger,
    basis: AmountBasis,
) -> Result<Finding<RoundAmountEntry>> {
    ledger.require(
        CheckName::RoundAmounts.section(),
        &[Field::JournalId, Field::Account, Field::Period, basis.field()],
    )?;

    let unit = Decimal::from(ROUND_AMOUNT_UNIT);
    let flagged = ledger
        .entries()
        .iter()
        .filter_map(|entry| {
            let amount = basis.value(entry)?;
            amount.is_multiple_of(unit).then(|| RoundAmountEntry {
                journal_id: entry.journal_id.clone(),
                account: entry.account.clone(),
                period: entry.period.clone(),
                amount,
                basis,
            })
        })
        .collect();

    Ok(Finding::new(flagged))
}

/// Flags lines whose document date is more than [`LATE_POSTING_OFFSET`] after the entry date.
///
/// When the entry-date column holds plain numbers the offset is added to the
/// number; otherwise both dates are parsed as calendar dates and the offset is
/// in days. Lines whose dates cannot be read are left out.
pub fn late_posting_entries(
    ledger: &DerivedLedger,
    basis: AmountBasis,
) -> Result<Finding<LatePostingEntry>> {
    ledger.require(
        CheckName::LatePostings.section(),
        &[
            Field::JournalId,
            Field::DocumentDate,
            Field::EnteredDate,
            Field::Period,
            basis.field(),
        ],
    )?;

    let encoding = DateEncoding::detect(
        ledger
            .entries()
            .iter()
            .filter_map(|e| e.entered_date.as_deref()),
    );
    debug!("Entered_Date encoding: {:?}", encoding);

    let mut flagged = Vec::new();
    for entry in ledger.entries() {
        let (Some(document), Some(entered)) = (&entry.document_date, &entry.entered_date) else {
            continue;
        };
        let late = match encoding {
            DateEncoding::Numeric => {
                match (Decimal::from_str(document.trim()), Decimal::from_str(entered.trim())) {
                    (Ok(d), Ok(e)) => is_late_numeric(d, e),
                    _ => None,
                }
            }
            DateEncoding::Calendar => {
                match (parse_calendar_date(document), parse_calendar_date(entered)) {
                    (Some(d), Some(e)) => is_late_calendar(d, e),
                    _ => None,
                }
            }
        };

        match late {
            Some(true) => flagged.push(LatePostingEntry {
                journal_id: entry.journal_id.clone(),
                document_date: document.clone(),
                entered_date: entered.clone(),
                period: entry.period.clone(),
                amount: basis.value(entry),
                basis,
            }),
            Some(false) => {}
            None => debug!(
                "Row {}: unreadable or out-of-range document/entry date, skipped",
                entry.row
            ),
        }
    }

    Ok(Finding::new(flagged))
}

/// `None` when the entry date plus the offset leaves the decimal range.
fn is_late_numeric(document: Decimal, entered: Decimal) -> Option<bool> {
    entered
        .checked_add(Decimal::from(LATE_POSTING_OFFSET))
        .map(|limit| document > limit)
}

/// `None` when the entry date plus the offset leaves the calendar range.
fn is_late_calendar(document: NaiveDate, entered: NaiveDate) -> Option<bool> {
    entered
        .checked_add_signed(Duration::days(LATE_POSTING_OFFSET))
        .map(|limit| document > limit)
}
