//! Error types for the audit engine.

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors that can occur while ingesting data or running checks.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be decoded
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Inbound file lacks a column the translation table requires
    #[error("{file} file is missing required column '{column}'")]
    SchemaMismatch { file: &'static str, column: String },

    /// A check needs a canonical field that is absent after normalization
    #[error("check '{check}' requires field '{field}' which is not present")]
    MissingField {
        check: &'static str,
        field: &'static str,
    },

    /// Date/time text could not be parsed with the configured format
    #[error("cannot parse '{input}' with format '{format}'")]
    DateTimeParse { input: String, format: String },

    /// Summing a journal's amounts left the decimal range
    #[error("check '{check}' overflowed summing journal {journal}")]
    AmountOverflow {
        check: &'static str,
        journal: String,
    },

    /// The client identifier used to name the report is blank
    #[error("client identifier must not be empty")]
    EmptyClient,
}
