//! Audit run orchestration.
//!
//! Loads the extracts, derives `Net` once, then runs every check against the
//! same read-only ledger. A check that cannot run is recorded as a warning
//! with an empty section; it never stops the others.

use crate::config::AuditConfig;
use crate::digits::leading_digits;
use crate::error::{AuditError, Result};
use crate::finding::{CheckName, Finding};
use crate::frequency::{rare_accounts, rare_users};
use crate::integrity::{
    duplicate_entries, incomplete_entries, late_posting_entries, round_amount_entries,
    AmountBasis,
};
use crate::ledger::{Ledger, SystemLog};
use crate::reconcile::{amount_comparison, entry_comparison};
use crate::report::{AuditReport, CheckWarning};
use crate::sequence::range_gaps;
use crate::timing::{night_entries, weekend_entries};
use log::{info, warn};
use std::io::Read;

/// The audit engine.
///
/// Holds the run configuration; each call to [`AuditEngine::run`] is an
/// independent batch over one ledger.
pub struct AuditEngine {
    config: AuditConfig,
}

impl AuditEngine {
    /// Creates an engine with default settings.
    pub fn new() -> Self {
        Self::with_config(AuditConfig::default())
    }

    pub fn with_config(config: AuditConfig) -> Self {
        AuditEngine { config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Reads a general-ledger CSV extract.
    pub fn load_ledger<R: Read>(&self, reader: R) -> Result<Ledger> {
        Ledger::from_csv(reader, self.config.strict_schema)
    }

    /// Reads a system-log CSV extract.
    pub fn load_log<R: Read>(&self, reader: R) -> Result<SystemLog> {
        SystemLog::from_csv(reader, self.config.strict_schema)
    }

    /// Runs every check and assembles the report.
    ///
    /// Reconciliation sections are only produced when `log` is given. The
    /// amount column used by the integrity checks follows the same switch:
    /// with a log, completeness sums `Net` and the line-level checks read
    /// `Amount`; without one, completeness sums `Amount` and the line-level
    /// checks read `Net`.
    pub fn run(
        &self,
        client: &str,
        ledger: Ledger,
        log: Option<&SystemLog>,
    ) -> Result<AuditReport> {
        if client.trim().is_empty() {
            return Err(AuditError::EmptyClient);
        }

        let ledger = ledger.derive_net(self.config.sign_policy);
        let (balance_basis, line_basis) = match log {
            Some(_) => (AmountBasis::Net, AmountBasis::Amount),
            None => (AmountBasis::Amount, AmountBasis::Net),
        };
        let format = self.config.datetime_format.as_str();

        if log.is_none() {
            for name in CheckName::ALL.iter().filter(|n| n.needs_log()) {
                info!("{}: no system log, section omitted", name);
            }
        }

        let mut warnings = Vec::new();
        let w = &mut warnings;

        let range_gaps = settle(CheckName::RangeGaps, range_gaps(&ledger), w);
        let (entry_comparison, amount_comparison) = match log {
            Some(log) => (
                Some(settle(
                    CheckName::EntryComparison,
                    entry_comparison(&ledger, log),
                    w,
                )),
                Some(settle(
                    CheckName::AmountComparison,
                    amount_comparison(&ledger, log),
                    w,
                )),
            ),
            None => (None, None),
        };
        let incomplete_entries = settle(
            CheckName::IncompleteEntries,
            incomplete_entries(&ledger, balance_basis),
            w,
        );
        let round_amounts = settle(
            CheckName::RoundAmounts,
            round_amount_entries(&ledger, line_basis),
            w,
        );
        let duplicates = settle(
            CheckName::Duplicates,
            duplicate_entries(&ledger, line_basis),
            w,
        );
        let late_postings = settle(
            CheckName::LatePostings,
            late_posting_entries(&ledger, line_basis),
            w,
        );
        let weekend_entries = settle(
            CheckName::WeekendEntries,
            weekend_entries(&ledger, format),
            w,
        );
        let night_entries = settle(CheckName::NightEntries, night_entries(&ledger, format), w);
        let rare_users = settle(CheckName::RareUsers, rare_users(&ledger), w);
        let rare_accounts = settle(CheckName::RareAccounts, rare_accounts(&ledger), w);
        let leading_digits = settle(CheckName::LeadingDigits, leading_digits(&ledger), w);

        Ok(AuditReport {
            client: client.trim().to_string(),
            range_gaps,
            entry_comparison,
            amount_comparison,
            incomplete_entries,
            round_amounts,
            duplicates,
            late_postings,
            weekend_entries,
            night_entries,
            rare_users,
            rare_accounts,
            leading_digits,
            warnings,
        })
    }
}

/// Turns a failed check into an empty finding plus a warning.
fn settle<T>(
    name: CheckName,
    result: Result<Finding<T>>,
    warnings: &mut Vec<CheckWarning>,
) -> Finding<T> {
    match result {
        Ok(finding) => {
            info!("{}: {} instances detected", name, finding.instances);
            finding
        }
        Err(e) => {
            warn!("{}: skipped, {}", name, e);
            warnings.push(CheckWarning {
                check: name,
                message: e.to_string(),
            });
            Finding::empty()
        }
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}
