//! Raw tabular input and header normalization.
//!
//! Inbound extracts use the export headers of the source system. They are
//! renamed onto canonical field names through fixed translation tables;
//! headers that are not in a table pass through untouched.

use crate::error::{AuditError, Result};
use csv::{ReaderBuilder, Trim};
use std::fmt;
use std::io::Read;

/// Header translation for the general-ledger extract.
pub const GL_HEADER_MAP: &[(&str, &str)] = &[
    ("Document Number", "Journal_ID"),
    ("Debit/Credit ind", "Amount_Credit_Debit_Indicator"),
    ("Posting period", "Period"),
    ("Amount in Doc. Curr.", "Amount"),
    ("G/L Account", "GL_Account_Number"),
    ("Document Date", "Document_Date"),
    ("Entry Date", "Entered_Date"),
    ("Time of Entry", "Entered_Time"),
    ("User Name", "Entered_By"),
];

/// Header translation for the system-log extract.
pub const LOG_HEADER_MAP: &[(&str, &str)] = &[
    ("Document Number", "Journal_ID"),
    ("Debit/Credit ind", "Amount_Credit_Debit_Indicator"),
    ("Amount", "Amount"),
];

/// Canonical ledger fields a check may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    JournalId,
    Indicator,
    Period,
    Amount,
    Account,
    DocumentDate,
    EnteredDate,
    EnteredTime,
    EnteredBy,
    /// Derived signed amount.
    Net,
}

impl Field {
    /// Fields read from the inbound ledger file.
    pub const INBOUND: [Field; 9] = [
        Field::JournalId,
        Field::Indicator,
        Field::Period,
        Field::Amount,
        Field::Account,
        Field::DocumentDate,
        Field::EnteredDate,
        Field::EnteredTime,
        Field::EnteredBy,
    ];

    /// Canonical column name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::JournalId => "Journal_ID",
            Field::Indicator => "Amount_Credit_Debit_Indicator",
            Field::Period => "Period",
            Field::Amount => "Amount",
            Field::Account => "GL_Account_Number",
            Field::DocumentDate => "Document_Date",
            Field::EnteredDate => "Entered_Date",
            Field::EnteredTime => "Entered_Time",
            Field::EnteredBy => "Entered_By",
            Field::Net => "Net",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A header row plus string cells, as read from a CSV extract.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Reads every record of a CSV source. Short rows are padded with empty cells.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(RawTable { headers, rows })
    }

    /// Renames headers found in `map`; unmapped headers are left as they are.
    pub fn normalize(&mut self, map: &[(&str, &str)]) {
        for header in &mut self.headers {
            if let Some((_, canonical)) = map.iter().find(|(source, _)| *source == header.as_str())
            {
                *header = canonical.to_string();
            }
        }
    }

    /// Position of a column by (normalized) name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, `None` when the cell is empty.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Fails with `SchemaMismatch` unless every canonical column of `map` is present.
    pub fn require_all(&self, file: &'static str, map: &[(&str, &str)]) -> Result<()> {
        for (_, canonical) in map {
            self.require(file, canonical)?;
        }
        Ok(())
    }

    /// Fails with `SchemaMismatch` when `column` is absent.
    pub fn require(&self, file: &'static str, column: &str) -> Result<()> {
        match self.column(column) {
            Some(_) => Ok(()),
            None => Err(AuditError::SchemaMismatch {
                file,
                column: column.to_string(),
            }),
        }
    }
}
