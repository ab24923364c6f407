//! Check results and the fixed set of check names.

use serde::Serialize;
use std::fmt;

/// Rows flagged by one check, plus the number of instances detected.
///
/// An empty finding is a valid result: nothing was flagged.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding<T> {
    pub rows: Vec<T>,
    pub instances: usize,
}

impl<T> Finding<T> {
    /// A finding whose instance count is its row count.
    pub fn new(rows: Vec<T>) -> Self {
        let instances = rows.len();
        Finding { rows, instances }
    }

    /// A finding whose instance count is not the row count, e.g. a summary row.
    pub fn with_instances(rows: Vec<T>, instances: usize) -> Self {
        Finding { rows, instances }
    }

    pub fn empty() -> Self {
        Finding {
            rows: Vec::new(),
            instances: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for Finding<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Report sections, one per check, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CheckName {
    RangeGaps,
    EntryComparison,
    AmountComparison,
    IncompleteEntries,
    RoundAmounts,
    Duplicates,
    LatePostings,
    WeekendEntries,
    NightEntries,
    RareUsers,
    RareAccounts,
    LeadingDigits,
}

impl CheckName {
    pub const ALL: [CheckName; 12] = [
        CheckName::RangeGaps,
        CheckName::EntryComparison,
        CheckName::AmountComparison,
        CheckName::IncompleteEntries,
        CheckName::RoundAmounts,
        CheckName::Duplicates,
        CheckName::LatePostings,
        CheckName::WeekendEntries,
        CheckName::NightEntries,
        CheckName::RareUsers,
        CheckName::RareAccounts,
        CheckName::LeadingDigits,
    ];

    /// Section name used in the report artifact.
    pub fn section(&self) -> &'static str {
        match self {
            CheckName::RangeGaps => "Range_Gaps",
            CheckName::EntryComparison => "entry_comparison",
            CheckName::AmountComparison => "amount_comparison",
            CheckName::IncompleteEntries => "incomplete_gl_entries",
            CheckName::RoundAmounts => "round_amount_entries",
            CheckName::Duplicates => "duplicate_entries",
            CheckName::LatePostings => "late_posting_entries",
            CheckName::WeekendEntries => "weekend_entries",
            CheckName::NightEntries => "night_entries",
            CheckName::RareUsers => "rare_users",
            CheckName::RareAccounts => "rare_accounts",
            CheckName::LeadingDigits => "benford's_law",
        }
    }

    /// Sections that only exist when a system log was supplied.
    pub fn needs_log(&self) -> bool {
        matches!(
            self,
            CheckName::EntryComparison | CheckName::AmountComparison
        )
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}
