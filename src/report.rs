//! The assembled audit report and its CSV rendering.
//!
//! The report is written as a directory named after the client, holding one
//! CSV file per section.

use crate::digits::DigitFrequency;
use crate::error::Result;
use crate::finding::{CheckName, Finding};
use crate::frequency::RareEntry;
use crate::integrity::{DuplicateEntry, IncompleteEntry, LatePostingEntry, RoundAmountEntry};
use crate::reconcile::{AmountMismatch, ExistenceSummary};
use crate::sequence::RangeGap;
use crate::timing::{NightEntry, WeekendEntry};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A row type that can be written as a report section.
pub trait ReportRow: Serialize {
    /// Header written for the section, also when no rows were flagged.
    const COLUMNS: &'static [&'static str];
}

impl ReportRow for RangeGap {
    const COLUMNS: &'static [&'static str] = &["Gap_Start", "Gap_End"];
}

impl ReportRow for ExistenceSummary {
    const COLUMNS: &'static [&'static str] = &["In_GL_not_in_LOG", "In_LOG_not_in_GL", "In_both"];
}

impl ReportRow for AmountMismatch {
    const COLUMNS: &'static [&'static str] = &[
        "Journal_ID",
        "Amount_Credit_Debit_Indicator",
        "Net",
        "Total",
        "Comparison",
    ];
}

impl ReportRow for IncompleteEntry {
    const COLUMNS: &'static [&'static str] = &["Journal_ID", "Residual", "Basis"];
}

impl ReportRow for DuplicateEntry {
    const COLUMNS: &'static [&'static str] = &[
        "Journal_ID",
        "GL_Account_Number",
        "Period",
        "Amount",
        "Basis",
        "Journal_Entry_Count",
    ];
}

impl ReportRow for RoundAmountEntry {
    const COLUMNS: &'static [&'static str] =
        &["Journal_ID", "GL_Account_Number", "Period", "Amount", "Basis"];
}

impl ReportRow for LatePostingEntry {
    const COLUMNS: &'static [&'static str] = &[
        "Journal_ID",
        "Document_Date",
        "Entered_Date",
        "Period",
        "Amount",
        "Basis",
    ];
}

impl ReportRow for WeekendEntry {
    const COLUMNS: &'static [&'static str] = &[
        "Journal_ID",
        "Entered_Date",
        "Entered_Time",
        "Entry_Date_Time_Formatted",
        "WeekDayNo",
    ];
}

impl ReportRow for NightEntry {
    const COLUMNS: &'static [&'static str] = &[
        "Journal_ID",
        "Entered_Date",
        "Entered_Time",
        "Entry_Date_Time_Formatted",
        "Hour",
    ];
}

impl ReportRow for RareEntry {
    const COLUMNS: &'static [&'static str] =
        &["Journal_ID", "GL_Account_Number", "Entered_By", "Entered_Count"];
}

impl ReportRow for DigitFrequency {
    const COLUMNS: &'static [&'static str] = &["first_digit", "Countz", "percentz"];
}

/// A check that could not run, kept so the operator sees why its section is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckWarning {
    pub check: CheckName,
    pub message: String,
}

/// Results of every check for one client.
///
/// Reconciliation sections are `None` when no system log was supplied.
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub(crate) client: String,
    pub(crate) range_gaps: Finding<RangeGap>,
    pub(crate) entry_comparison: Option<Finding<ExistenceSummary>>,
    pub(crate) amount_comparison: Option<Finding<AmountMismatch>>,
    pub(crate) incomplete_entries: Finding<IncompleteEntry>,
    pub(crate) round_amounts: Finding<RoundAmountEntry>,
    pub(crate) duplicates: Finding<DuplicateEntry>,
    pub(crate) late_postings: Finding<LatePostingEntry>,
    pub(crate) weekend_entries: Finding<WeekendEntry>,
    pub(crate) night_entries: Finding<NightEntry>,
    pub(crate) rare_users: Finding<RareEntry>,
    pub(crate) rare_accounts: Finding<RareEntry>,
    pub(crate) leading_digits: Finding<DigitFrequency>,
    pub(crate) warnings: Vec<CheckWarning>,
}

impl AuditReport {
    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn range_gaps(&self) -> &Finding<RangeGap> {
        &self.range_gaps
    }

    pub fn entry_comparison(&self) -> Option<&Finding<ExistenceSummary>> {
        self.entry_comparison.as_ref()
    }

    pub fn amount_comparison(&self) -> Option<&Finding<AmountMismatch>> {
        self.amount_comparison.as_ref()
    }

    pub fn incomplete_entries(&self) -> &Finding<IncompleteEntry> {
        &self.incomplete_entries
    }

    pub fn round_amounts(&self) -> &Finding<RoundAmountEntry> {
        &self.round_amounts
    }

    pub fn duplicates(&self) -> &Finding<DuplicateEntry> {
        &self.duplicates
    }

    pub fn late_postings(&self) -> &Finding<LatePostingEntry> {
        &self.late_postings
    }

    pub fn weekend_entries(&self) -> &Finding<WeekendEntry> {
        &self.weekend_entries
    }

    pub fn night_entries(&self) -> &Finding<NightEntry> {
        &self.night_entries
    }

    pub fn rare_users(&self) -> &Finding<RareEntry> {
        &self.rare_users
    }

    pub fn rare_accounts(&self) -> &Finding<RareEntry> {
        &self.rare_accounts
    }

    pub fn leading_digits(&self) -> &Finding<DigitFrequency> {
        &self.leading_digits
    }

    pub fn warnings(&self) -> &[CheckWarning] {
        &self.warnings
    }

    /// Instance count of every section present in the report, in output order.
    pub fn summary(&self) -> Vec<(CheckName, usize)> {
        CheckName::ALL
            .iter()
            .filter_map(|&name| self.instances(name).map(|n| (name, n)))
            .collect()
    }

    /// Instance count of one section, `None` if the section is absent.
    pub fn instances(&self, name: CheckName) -> Option<usize> {
        match name {
            CheckName::RangeGaps => Some(self.range_gaps.instances),
            CheckName::EntryComparison => self.entry_comparison.as_ref().map(|f| f.instances),
            CheckName::AmountComparison => self.amount_comparison.as_ref().map(|f| f.instances),
            CheckName::IncompleteEntries => Some(self.incomplete_entries.instances),
            CheckName::RoundAmounts => Some(self.round_amounts.instances),
            CheckName::Duplicates => Some(self.duplicates.instances),
            CheckName::LatePostings => Some(self.late_postings.instances),
            CheckName::WeekendEntries => Some(self.weekend_entries.instances),
            CheckName::NightEntries => Some(self.night_entries.instances),
            CheckName::RareUsers => Some(self.rare_users.instances),
            CheckName::RareAccounts => Some(self.rare_accounts.instances),
            CheckName::LeadingDigits => Some(self.leading_digits.instances),
        }
    }

    /// Directory name of the written report, derived from the client identifier.
    pub fn artifact_name(&self) -> String {
        let safe: String = self
            .client
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("report_jet_{}", safe)
    }

    /// Writes the `section,instances` summary as CSV.
    pub fn write_summary<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["section", "instances"])?;
        for (name, instances) in self.summary() {
            csv_writer.write_record([name.section().to_string(), instances.to_string()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes every present section to `<base>/report_jet_<client>/<section>.csv`.
    ///
    /// Returns the report directory.
    pub fn write_to_dir(&self, base: &Path) -> Result<PathBuf> {
        let dir = base.join(self.artifact_name());
        fs::create_dir_all(&dir)?;

        write_section(&dir, CheckName::RangeGaps, &self.range_gaps)?;
        if let Some(finding) = &self.entry_comparison {
            write_section(&dir, CheckName::EntryComparison, finding)?;
        }
        if let Some(finding) = &self.amount_comparison {
            write_section(&dir, CheckName::AmountComparison, finding)?;
        }
        write_section(&dir, CheckName::IncompleteEntries, &self.incomplete_entries)?;
        write_section(&dir, CheckName::RoundAmounts, &self.round_amounts)?;
        write_section(&dir, CheckName::Duplicates, &self.duplicates)?;
        write_section(&dir, CheckName::LatePostings, &self.late_postings)?;
        write_section(&dir, CheckName::WeekendEntries, &self.weekend_entries)?;
        write_section(&dir, CheckName::NightEntries, &self.night_entries)?;
        write_section(&dir, CheckName::RareUsers, &self.rare_users)?;
        write_section(&dir, CheckName::RareAccounts, &self.rare_accounts)?;
        write_section(&dir, CheckName::LeadingDigits, &self.leading_digits)?;

        Ok(dir)
    }
}

fn write_section<T: ReportRow>(dir: &Path, name: CheckName, finding: &Finding<T>) -> Result<()> {
    let path = dir.join(format!("{}.csv", name.section()));
    write_rows(File::create(path)?, finding)
}

/// Writes a finding as CSV; empty findings still get a header row.
pub fn write_rows<T: ReportRow, W: Write>(writer: W, finding: &Finding<T>) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if finding.is_empty() {
        csv_writer.write_record(T::COLUMNS)?;
    }
    for row in &finding.rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
