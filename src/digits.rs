//! First-significant-digit distribution of ledger amounts.
//!
//! This is a descriptive table only. It is not compared against the
//! Benford reference frequencies.

use crate::error::Result;
use crate::finding::{CheckName, Finding};
use crate::ledger::DerivedLedger;
use crate::schema::Field;
use rust_decimal::Decimal;
use serde::Serialize;

/// Count and share of one leading digit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitFrequency {
    #[serde(rename = "first_digit")]
    pub digit: u8,
    #[serde(rename = "Countz")]
    pub count: usize,
    /// Share of all amounts with a non-zero leading digit, in percent.
    #[serde(rename = "percentz")]
    pub percent: Decimal,
}

/// Tallies the leading digit of every `Amount`.
///
/// Amounts whose text starts with `0` after the sign (zero, or magnitudes
/// below one) are left out of both the counts and the percentage base. The
/// table always lists digits 1 through 9; the instance count is the number
/// of amounts counted.
pub fn leading_digits(ledger: &DerivedLedger) -> Result<Finding<DigitFrequency>> {
    ledger.require(CheckName::LeadingDigits.section(), &[Field::Amount])?;

    let mut counts = [0usize; 9];
    for digit in ledger
        .entries()
        .iter()
        .filter_map(|e| e.amount)
        .filter_map(|a| a.leading_digit())
    {
        counts[usize::from(digit) - 1] += 1;
    }

    let total: usize = counts.iter().sum();
    let rows = counts
        .iter()
        .zip(1u8..)
        .map(|(&count, digit)| DigitFrequency {
            digit,
            count,
            percent: if total == 0 {
                Decimal::ZERO
            } else {
                (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(4)
            },
        })
        .collect();

    Ok(Finding::with_instances(rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Ledger, SignPolicy};
    use std::io::Cursor;

    fn ledger(amounts: &[&str]) -> DerivedLedger {
        let mut csv = String::from("Journal_ID,Amount\n");
        for (i, a) in amounts.iter().enumerate() {
            csv.push_str(&format!("{},{}\n", i + 1, a));
        }
        Ledger::from_csv(Cursor::new(csv), false)
            .unwrap()
            .derive_net(SignPolicy::Infer)
    }

    #[test]
    fn test_zero_leading_digit_excluded() {
        let finding = leading_digits(&ledger(&["123", "-45", "0.5", "999"])).unwrap();
        assert_eq!(finding.instances, 3);
        assert_eq!(finding.rows.len(), 9);

        let count = |d: u8| finding.rows[usize::from(d) - 1].count;
        assert_eq!(count(1), 1);
        assert_eq!(count(4), 1);
        assert_eq!(count(9), 1);
        assert_eq!(count(2), 0);

        assert_eq!(finding.rows[0].percent.round_dp(2).to_string(), "33.33");
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let finding = leading_digits(&ledger(&["1", "10", "2", "300"])).unwrap();
        let total: Decimal = finding.rows.iter().map(|r| r.percent).sum();
        assert_eq!(total, Decimal::ONE_HUNDRED);
        assert_eq!(finding.rows[0].percent, Decimal::from(50));
    }

    #[test]
    fn test_no_amounts() {
        let finding = leading_digits(&ledger(&["0", "0.01"])).unwrap();
        assert_eq!(finding.instances, 0);
        assert!(finding.rows.iter().all(|r| r.percent.is_zero()));
    }
}
