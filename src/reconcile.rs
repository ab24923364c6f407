//! Ledger/system-log reconciliation.
//!
//! Two independent comparisons: which journals exist on each side, and
//! whether the amounts per journal and indicator agree.

use crate::amount::Amount;
use crate::error::{AuditError, Result};
use crate::finding::{CheckName, Finding};
use crate::ledger::{DerivedLedger, Indicator, JournalId, SystemLog};
use crate::schema::Field;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Journal counts by presence in ledger and log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExistenceSummary {
    #[serde(rename = "In_GL_not_in_LOG")]
    pub ledger_only: usize,
    #[serde(rename = "In_LOG_not_in_GL")]
    pub log_only: usize,
    #[serde(rename = "In_both")]
    pub in_both: usize,
}

/// A journal/indicator pair whose ledger and log magnitudes disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountMismatch {
    #[serde(rename = "Journal_ID")]
    pub journal_id: JournalId,
    #[serde(rename = "Amount_Credit_Debit_Indicator")]
    pub indicator: Option<Indicator>,
    /// Sum of ledger `Net`, zero when the pair is only in the log.
    #[serde(rename = "Net")]
    pub ledger_net: Amount,
    /// Log total, zero when the pair is only in the ledger.
    #[serde(rename = "Total")]
    pub log_total: Amount,
    #[serde(rename = "Comparison")]
    pub comparison: Amount,
}

/// Counts distinct journal IDs found only in the ledger, only in the log, and in both.
///
/// IDs are matched in normalized form, so `1` and `1.0` are the same journal.
/// The instance count is the number of journals missing from either side.
pub fn entry_comparison(
    ledger: &DerivedLedger,
    log: &SystemLog,
) -> Result<Finding<ExistenceSummary>> {
    ledger.require(CheckName::EntryComparison.section(), &[Field::JournalId])?;

    let in_ledger: BTreeSet<JournalId> = ledger
        .entries()
        .iter()
        .filter_map(|e| e.journal_id.as_ref().map(JournalId::normalized))
        .collect();
    let in_log: BTreeSet<JournalId> = log
        .entries()
        .iter()
        .map(|e| e.journal_id.normalized())
        .collect();

    let summary = ExistenceSummary {
        ledger_only: in_ledger.difference(&in_log).count(),
        log_only: in_log.difference(&in_ledger).count(),
        in_both: in_ledger.intersection(&in_log).count(),
    };

    Ok(Finding::with_instances(
        vec![summary],
        summary.ledger_only + summary.log_only,
    ))
}

/// Compares ledger `Net` sums with log totals per (journal, indicator).
///
/// Both sides are outer-joined with zero fill, rounded to two places and
/// compared by absolute value. A ledger sum of `-100` therefore matches a log
/// total of `100`: offsetting signs of equal magnitude are not mismatches.
/// Journal IDs are joined in normalized form. A sum that leaves the decimal
/// range fails the check.
pub fn amount_comparison(
    ledger: &DerivedLedger,
    log: &SystemLog,
) -> Result<Finding<AmountMismatch>> {
    ledger.require(
        CheckName::AmountComparison.section(),
        &[Field::JournalId, Field::Indicator, Field::Net],
    )?;

    type Key = (JournalId, Option<Indicator>);
    let mut joined: BTreeMap<Key, (Amount, Amount)> = BTreeMap::new();

    for entry in ledger.entries() {
        let (Some(id), Some(indicator)) = (&entry.journal_id, entry.indicator) else {
            continue;
        };
        let sums = joined
            .entry((id.normalized(), Some(indicator)))
            .or_insert((Amount::ZERO, Amount::ZERO));
        sums.0 = sums
            .0
            .checked_add(entry.net.unwrap_or(Amount::ZERO))
            .ok_or_else(|| overflow(id))?;
    }

    for entry in log.entries() {
        let sums = joined
            .entry((entry.journal_id.normalized(), entry.indicator))
            .or_insert((Amount::ZERO, Amount::ZERO));
        sums.1 = sums
            .1
            .checked_add(entry.total)
            .ok_or_else(|| overflow(&entry.journal_id))?;
    }

    let mismatches = joined
        .into_iter()
        .filter_map(|((journal_id, indicator), (ledger_net, log_total))| {
            let comparison = ledger_net.abs().round2() - log_total.abs().round2();
            (!comparison.is_zero()).then_some(AmountMismatch {
                journal_id,
                indicator,
                ledger_net,
                log_total,
                comparison,
            })
        })
        .collect();

    Ok(Finding::new(mismatches))
}

fn overflow(journal: &JournalId) -> AuditError {
    AuditError::AmountOverflow {
        check: CheckName::AmountComparison.section(),
        journal: journal.to_string(),
    }
}
