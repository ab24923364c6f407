//! Journal-ID sequence gap detection.

use crate::error::Result;
use crate::finding::{CheckName, Finding};
use crate::ledger::DerivedLedger;
use crate::schema::Field;
use log::debug;
use serde::Serialize;

/// A break between two adjacent journal lines whose IDs differ by more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeGap {
    #[serde(rename = "Gap_Start")]
    pub start: i64,
    #[serde(rename = "Gap_End")]
    pub end: i64,
}

/// Scans journal IDs in file order and reports every jump greater than one.
///
/// The scan is positional: each line is compared with the line before it, so
/// an unsorted extract yields row-adjacency breaks rather than true numeric
/// gaps. Backward jumps are not reported. Lines whose ID is missing or not an
/// integer are skipped without resetting the comparison.
pub fn range_gaps(ledger: &DerivedLedger) -> Result<Finding<RangeGap>> {
    ledger.require(CheckName::RangeGaps.section(), &[Field::JournalId])?;

    let mut gaps = Vec::new();
    let mut previous: Option<i64> = None;

    for entry in ledger.entries() {
        let current = match entry.journal_id.as_ref().and_then(|id| id.numeric()) {
            Some(n) => n,
            None => {
                debug!("Row {}: journal ID is not an integer, skipped", entry.row);
                continue;
            }
        };
        if let Some(prev) = previous {
            if current.saturating_sub(prev) > 1 {
                gaps.push(RangeGap {
                    start: prev,
                    end: current,
                });
            }
        }
        previous = Some(current);
    }

    Ok(Finding::new(gaps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Ledger, SignPolicy};
    use std::io::Cursor;

    fn gaps_for(ids: &[&str]) -> Vec<(i64, i64)> {
        let csv = format!("Journal_ID\n{}\n", ids.join("\n"));
        let ledger = Ledger::from_csv(Cursor::new(csv), false)
            .unwrap()
            .derive_net(SignPolicy::Infer);
        range_gaps(&ledger)
            .unwrap()
            .rows
            .iter()
            .map(|g| (g.start, g.end))
            .collect()
    }

    #[test]
    fn test_single_gap() {
        assert_eq!(gaps_for(&["100", "101", "102", "105", "106"]), vec![(102, 105)]);
    }

    #[test]
    fn test_contiguous_ids_have_no_gaps() {
        assert!(gaps_for(&["1", "2", "2", "3", "4"]).is_empty());
    }

    #[test]
    fn test_scan_is_positional() {
        assert_eq!(gaps_for(&["5", "1", "3"]), vec![(1, 3)]);
    }

    #[test]
    fn test_non_numeric_ids_are_skipped() {
        assert_eq!(gaps_for(&["1", "X9", "4"]), vec![(1, 4)]);
    }

    #[test]
    fn test_empty_ledger() {
        assert!(gaps_for(&[]).is_empty());
    }
}
