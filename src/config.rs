//! Run configuration.
//!
//! Loaded from an optional TOML file; every key has a default.
//!
//! ```toml
//! datetime_format = "%Y%m%d%H%M%S"
//! sign_policy = "infer"
//! strict_schema = false
//! ```

use crate::datetime::COMPACT_DATETIME_FORMAT;
use crate::error::Result;
use crate::ledger::SignPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings for one audit run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// `chrono` format for the joined `Entered_Date` + `Entered_Time` text.
    pub datetime_format: String,

    /// How `Net` is derived from `Amount` and the debit/credit indicator.
    pub sign_policy: SignPolicy,

    /// Reject extracts lacking any translated column instead of only `Journal_ID`.
    pub strict_schema: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            datetime_format: COMPACT_DATETIME_FORMAT.to_string(),
            sign_policy: SignPolicy::Infer,
            strict_schema: false,
        }
    }
}

impl AuditConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(AuditConfig::from_toml("").unwrap(), AuditConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AuditConfig::from_toml(
            "datetime_format = \"%Y-%m-%d%H:%M:%S\"\nsign_policy = \"presigned\"\n",
        )
        .unwrap();
        assert_eq!(config.datetime_format, "%Y-%m-%d%H:%M:%S");
        assert_eq!(config.sign_policy, SignPolicy::Presigned);
        assert!(!config.strict_schema);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = AuditConfig::from_toml("threshold = 3\n").unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        fs::write(&path, "strict_schema = true\n").unwrap();
        assert!(AuditConfig::load(&path).unwrap().strict_schema);
    }
}
