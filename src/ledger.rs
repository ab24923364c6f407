//! Ledger and system-log models, plus net-amount derivation.

use crate::amount::Amount;
use crate::error::{AuditError, Result};
use crate::schema::{Field, RawTable, GL_HEADER_MAP, LOG_HEADER_MAP};
use log::{debug, info, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Identifier shared by all lines of one accounting transaction.
///
/// Ordering is numeric when both identifiers are integers and falls back to
/// text comparison otherwise, so report sections list journals naturally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JournalId(String);

impl JournalId {
    pub fn new(id: impl Into<String>) -> Self {
        JournalId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the identifier. Accepts `105` and `105.0`.
    pub fn numeric(&self) -> Option<i64> {
        let d = Decimal::from_str(self.0.trim()).ok()?;
        if !d.fract().is_zero() {
            return None;
        }
        d.to_i64()
    }

    /// Integer identifiers in canonical form (`105.0` becomes `105`), other
    /// identifiers trimmed.
    pub fn normalized(&self) -> JournalId {
        match self.numeric() {
            Some(n) => JournalId(n.to_string()),
            None => JournalId(self.0.trim().to_string()),
        }
    }
}

impl Ord for JournalId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for JournalId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Debit/credit indicator of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Indicator {
    Debit,
    Credit,
}

impl Indicator {
    /// Parses SAP (`S`/`H`) and common English codes, case-insensitively.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "S" | "D" | "DR" | "DEBIT" => Some(Indicator::Debit),
            "H" | "C" | "CR" | "CREDIT" => Some(Indicator::Credit),
            _ => None,
        }
    }
}

/// How the signed `Net` amount is obtained from `Amount` and `Indicator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SignPolicy {
    /// Use the amounts as-is if they already carry both signs, otherwise apply
    /// the indicator.
    #[default]
    Infer,
    /// Always negate credit lines.
    Indicator,
    /// Always take the amount verbatim.
    Presigned,
}

/// One journal line. Every field is optional because extracts differ in
/// which columns they carry.
#[derive(Debug, Clone, Default)]
pub struct LedgerEntry {
    /// Line number in the source file (header is line 1).
    pub row: usize,
    pub journal_id: Option<JournalId>,
    pub indicator: Option<Indicator>,
    pub period: Option<String>,
    pub amount: Option<Amount>,
    pub account: Option<String>,
    pub document_date: Option<String>,
    pub entered_date: Option<String>,
    pub entered_time: Option<String>,
    pub entered_by: Option<String>,
    /// Signed amount, filled in once by [`Ledger::derive_net`].
    pub net: Option<Amount>,
}

/// A normalized general ledger before net amounts are derived.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    columns: BTreeSet<Field>,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Builds a ledger from already-typed entries and the set of columns
    /// the source carried.
    pub fn new(columns: impl IntoIterator<Item = Field>, entries: Vec<LedgerEntry>) -> Self {
        Ledger {
            columns: columns.into_iter().filter(|f| *f != Field::Net).collect(),
            entries,
        }
    }

    /// Reads and normalizes a ledger CSV extract.
    ///
    /// `Journal_ID` must be present; with `strict` every translated column must be.
    pub fn from_csv<R: Read>(reader: R, strict: bool) -> Result<Self> {
        let mut table = RawTable::from_csv(reader)?;
        table.normalize(GL_HEADER_MAP);
        Self::from_table(&table, strict)
    }

    pub fn from_table(table: &RawTable, strict: bool) -> Result<Self> {
        if strict {
            table.require_all("ledger", GL_HEADER_MAP)?;
        } else {
            table.require("ledger", Field::JournalId.name())?;
        }

        let index = |field: Field| table.column(field.name());
        let columns: BTreeSet<Field> = Field::INBOUND
            .iter()
            .copied()
            .filter(|f| index(*f).is_some())
            .collect();

        let text = |row: usize, field: Field| -> Option<String> {
            index(field)
                .and_then(|c| table.cell(row, c))
                .map(str::to_string)
        };

        let mut entries = Vec::with_capacity(table.rows.len());
        for row in 0..table.rows.len() {
            let line = row + 2;

            let amount = text(row, Field::Amount).and_then(|s| match Amount::from_str(&s) {
                Ok(a) => Some(a),
                Err(e) => {
                    warn!("Row {}: unparsable amount '{}': {}", line, s, e);
                    None
                }
            });

            let indicator = text(row, Field::Indicator).and_then(|s| {
                let parsed = Indicator::parse(&s);
                if parsed.is_none() {
                    warn!("Row {}: unknown debit/credit indicator '{}'", line, s);
                }
                parsed
            });

            entries.push(LedgerEntry {
                row: line,
                journal_id: text(row, Field::JournalId).map(JournalId::new),
                indicator,
                period: text(row, Field::Period),
                amount,
                account: text(row, Field::Account),
                document_date: text(row, Field::DocumentDate),
                entered_date: text(row, Field::EnteredDate),
                entered_time: text(row, Field::EnteredTime),
                entered_by: text(row, Field::EnteredBy),
                net: None,
            });
        }

        debug!("Loaded {} ledger lines, columns {:?}", entries.len(), columns);
        Ok(Ledger { columns, entries })
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Computes `Net` for every line and freezes the ledger for checking.
    ///
    /// Without an `Amount` column no `Net` is produced and checks that need
    /// it report a missing field.
    pub fn derive_net(self, policy: SignPolicy) -> DerivedLedger {
        let Ledger {
            mut columns,
            mut entries,
        } = self;

        if !columns.contains(&Field::Amount) {
            warn!("No Amount column; Net cannot be derived");
            return DerivedLedger { columns, entries };
        }

        let apply_indicator = match policy {
            SignPolicy::Indicator => true,
            SignPolicy::Presigned => false,
            SignPolicy::Infer => {
                let amounts = || entries.iter().filter_map(|e| e.amount);
                let mixed =
                    amounts().any(|a| a.is_positive()) && amounts().any(|a| a.is_negative());
                if mixed {
                    info!("Amounts carry both signs; using them as Net");
                }
                !mixed
            }
        };

        for entry in &mut entries {
            entry.net = entry.amount.map(|a| {
                if apply_indicator && entry.indicator == Some(Indicator::Credit) {
                    -a
                } else {
                    a
                }
            });
        }

        columns.insert(Field::Net);
        DerivedLedger { columns, entries }
    }
}

/// A ledger whose `Net` amounts have been derived. Checks read from this
/// view only and never modify it.
#[derive(Debug, Clone, Default)]
pub struct DerivedLedger {
    columns: BTreeSet<Field>,
    entries: Vec<LedgerEntry>,
}

impl DerivedLedger {
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    /// Fails with `MissingField` on the first of `fields` that is absent.
    pub fn require(&self, check: &'static str, fields: &[Field]) -> Result<()> {
        match fields.iter().find(|f| !self.has(**f)) {
            Some(missing) => Err(AuditError::MissingField {
                check,
                field: missing.name(),
            }),
            None => Ok(()),
        }
    }
}

/// One expected journal total from the independent system log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub journal_id: JournalId,
    pub indicator: Option<Indicator>,
    /// Expected total; zero when the log carries no total.
    pub total: Amount,
}

/// System-log extract used for reconciliation.
#[derive(Debug, Clone, Default)]
pub struct SystemLog {
    entries: Vec<LogEntry>,
}

impl SystemLog {
    /// Column holding the expected journal total.
    pub const TOTAL_COLUMN: &'static str = "Total";

    pub fn new(entries: Vec<LogEntry>) -> Self {
        SystemLog { entries }
    }

    /// Reads and normalizes a log CSV extract.
    pub fn from_csv<R: Read>(reader: R, strict: bool) -> Result<Self> {
        let mut table = RawTable::from_csv(reader)?;
        table.normalize(LOG_HEADER_MAP);
        Self::from_table(&table, strict)
    }

    pub fn from_table(table: &RawTable, strict: bool) -> Result<Self> {
        if strict {
            table.require_all("log", LOG_HEADER_MAP)?;
        } else {
            table.require("log", Field::JournalId.name())?;
        }

        let id_col = table.column(Field::JournalId.name());
        let ind_col = table.column(Field::Indicator.name());
        let total_col = table.column(Self::TOTAL_COLUMN);
        if total_col.is_none() {
            debug!("Log has no '{}' column; totals default to zero", Self::TOTAL_COLUMN);
        }

        let mut entries = Vec::with_capacity(table.rows.len());
        for row in 0..table.rows.len() {
            let line = row + 2;
            let journal_id = match id_col.and_then(|c| table.cell(row, c)) {
                Some(id) => JournalId::new(id),
                None => {
                    warn!("Log row {}: missing Journal_ID, skipped", line);
                    continue;
                }
            };
            let indicator = ind_col
                .and_then(|c| table.cell(row, c))
                .and_then(Indicator::parse);
            let total = total_col
                .and_then(|c| table.cell(row, c))
                .and_then(|s| match Amount::from_str(s) {
                    Ok(a) => Some(a),
                    Err(e) => {
                        warn!("Log row {}: unparsable total '{}': {}", line, s, e);
                        None
                    }
                })
                .unwrap_or(Amount::ZERO);

            entries.push(LogEntry {
                journal_id,
                indicator,
                total,
            });
        }

        Ok(SystemLog { entries })
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}
