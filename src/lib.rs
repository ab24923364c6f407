//! # Ledger Audit
//!
//! Runs a fixed battery of journal-entry tests over a general-ledger
//! extract, optionally reconciled against a system-log extract, and
//! collects the flagged lines of every test into one report.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts are `rust_decimal` values, never floats
//! - **Derive once**: the signed `Net` amount is computed a single time before any check runs
//! - **Independent checks**: each check is a pure function of the derived ledger
//! - **Best effort**: a check missing a column yields a warning and an empty section
//!
//! ## Example
//!
//! ```no_run
//! use ledger_audit::AuditEngine;
//! use std::io::Cursor;
//!
//! let csv = "Document Number,Amount in Doc. Curr.,Debit/Credit ind\n1,100.0,S\n1,100.0,H\n";
//! let engine = AuditEngine::new();
//! let ledger = engine.load_ledger(Cursor::new(csv)).unwrap();
//! let report = engine.run("ACME", ledger, None).unwrap();
//! report.write_summary(std::io::stdout()).unwrap();
//! ```

pub mod amount;
pub mod config;
pub mod datetime;
pub mod digits;
pub mod engine;
pub mod error;
pub mod finding;
pub mod frequency;
pub mod integrity;
pub mod ledger;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod sequence;
pub mod timing;

pub use amount::Amount;
pub use config::AuditConfig;
pub use engine::AuditEngine;
pub use error::{AuditError, Result};
pub use finding::{CheckName, Finding};
pub use integrity::AmountBasis;
pub use ledger::{
    DerivedLedger, Indicator, JournalId, Ledger, LedgerEntry, LogEntry, SignPolicy, SystemLog,
};
pub use report::{AuditReport, CheckWarning};
pub use schema::{Field, RawTable};
