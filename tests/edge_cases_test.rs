//! Edge case tests for the audit checks.
//!
//! Each test builds a small ledger in memory and runs one check, or the whole
//! engine, through the public library API.

use ledger_audit::config::AuditConfig;
use ledger_audit::datetime::{COMPACT_DATETIME_FORMAT, ISO_DATETIME_FORMAT};
use ledger_audit::digits::leading_digits;
use ledger_audit::frequency::{rare_accounts, rare_users};
use ledger_audit::integrity::{
    duplicate_entries, incomplete_entries, late_posting_entries, round_amount_entries,
};
use ledger_audit::reconcile::{amount_comparison, entry_comparison};
use ledger_audit::sequence::range_gaps;
use ledger_audit::timing::{night_entries, weekend_entries};
use ledger_audit::{
    AmountBasis, AuditEngine, AuditError, CheckName, DerivedLedger, Indicator, Ledger, SignPolicy,
    SystemLog,
};
use rust_decimal::Decimal;
use std::io::Cursor;

fn derived(csv: &str) -> DerivedLedger {
    Ledger::from_csv(Cursor::new(csv), false)
        .unwrap()
        .derive_net(SignPolicy::Infer)
}

fn system_log(csv: &str) -> SystemLog {
    SystemLog::from_csv(Cursor::new(csv), false).unwrap()
}

// ============================================================================
// Sequence gaps
// ============================================================================

#[test]
fn test_gaps_follow_file_order() {
    let ledger = derived("Journal_ID\n5\n3\n7\n8\n");
    let gaps: Vec<(i64, i64)> = range_gaps(&ledger)
        .unwrap()
        .rows
        .iter()
        .map(|g| (g.start, g.end))
        .collect();

    // 5 -> 3 runs backwards and is not a gap.
    assert_eq!(gaps, vec![(3, 7)]);
}

#[test]
fn test_gaps_accept_float_formatted_ids() {
    let ledger = derived("Journal_ID\n100.0\n101.0\n104.0\n");
    let gaps = range_gaps(&ledger).unwrap();
    assert_eq!(gaps.instances, 1);
    assert_eq!((gaps.rows[0].start, gaps.rows[0].end), (101, 104));
}

#[test]
fn test_gaps_skip_non_numeric_ids() {
    let ledger = derived("Journal_ID\n10\nADJ-1\n11\n");
    assert!(range_gaps(&ledger).unwrap().is_empty());
}

#[test]
fn test_gaps_single_row() {
    let ledger = derived("Journal_ID\n42\n");
    assert!(range_gaps(&ledger).unwrap().is_empty());
}

// ============================================================================
// Net derivation
// ============================================================================

#[test]
fn test_infer_keeps_presigned_amounts() {
    let csv = "Journal_ID,Amount_Credit_Debit_Indicator,Amount\n1,S,100\n1,H,-100\n";
    let ledger = derived(csv);
    let nets: Vec<String> = ledger
        .entries()
        .iter()
        .map(|e| e.net.unwrap().to_string())
        .collect();
    assert_eq!(nets, vec!["100", "-100"]);
}

#[test]
fn test_indicator_policy_negates_credits() {
    let csv = "Journal_ID,Amount_Credit_Debit_Indicator,Amount\n1,DR,100\n1,CR,100\n";
    let ledger = Ledger::from_csv(Cursor::new(csv), false)
        .unwrap()
        .derive_net(SignPolicy::Indicator);
    assert_eq!(ledger.entries()[0].indicator, Some(Indicator::Debit));
    assert_eq!(ledger.entries()[1].net.unwrap().to_string(), "-100");
}

// ============================================================================
// Reconciliation
// ============================================================================

#[test]
fn test_existence_counts_distinct_ids() {
    let ledger = derived("Journal_ID,Amount\n1,10\n1,-10\n2,5\n");
    let log = system_log("Journal_ID,Total\n2,5\n3,7\n3,8\n");
    let finding = entry_comparison(&ledger, &log).unwrap();

    let summary = finding.rows[0];
    assert_eq!(
        (summary.ledger_only, summary.log_only, summary.in_both),
        (1, 1, 1)
    );
    assert_eq!(finding.instances, 2);
}

#[test]
fn test_amount_comparison_ignores_sign() {
    let ledger = derived(
        "Journal_ID,Amount_Credit_Debit_Indicator,Amount\n1,S,100\n1,H,100\n",
    );
    let log = system_log("Journal_ID,Amount_Credit_Debit_Indicator,Total\n1,S,100\n1,H,100\n");
    assert!(amount_comparison(&ledger, &log).unwrap().is_empty());
}

#[test]
fn test_amount_comparison_rounds_before_comparing() {
    let ledger = derived("Journal_ID,Amount_Credit_Debit_Indicator,Amount\n1,S,100.004\n");
    let log = system_log("Journal_ID,Amount_Credit_Debit_Indicator,Total\n1,S,100\n");
    assert!(amount_comparison(&ledger, &log).unwrap().is_empty());
}

#[test]
fn test_amount_comparison_log_only_pair() {
    let ledger = derived("Journal_ID,Amount_Credit_Debit_Indicator,Amount\n1,S,50\n");
    let log = system_log("Journal_ID,Amount_Credit_Debit_Indicator,Total\n1,S,50\n2,H,75\n");
    let finding = amount_comparison(&ledger, &log).unwrap();

    assert_eq!(finding.instances, 1);
    let row = &finding.rows[0];
    assert_eq!(row.journal_id.as_str(), "2");
    assert_eq!(row.indicator, Some(Indicator::Credit));
    assert!(row.ledger_net.is_zero());
    assert_eq!(row.comparison.to_string(), "-75");
}

#[test]
fn test_amount_comparison_needs_indicator() {
    let ledger = derived("Journal_ID,Amount\n1,50\n");
    let log = system_log("Journal_ID,Total\n1,50\n");
    assert!(matches!(
        amount_comparison(&ledger, &log),
        Err(AuditError::MissingField {
            field: "Amount_Credit_Debit_Indicator",
            ..
        })
    ));
}

// ============================================================================
// Integrity
// ============================================================================

#[test]
fn test_incomplete_ignores_sub_cent_residual() {
    let ledger = derived("Journal_ID,Amount\n1,100.004\n1,-100\n2,100.01\n2,-100\n");
    let finding = incomplete_entries(&ledger, AmountBasis::Net).unwrap();

    assert_eq!(finding.instances, 1);
    assert_eq!(finding.rows[0].journal_id.as_str(), "2");
    assert_eq!(finding.rows[0].residual.to_string(), "0.01");
}

#[test]
fn test_duplicates_list_whole_group() {
    let csv = "Journal_ID,GL_Account_Number,Period,Amount
1,4000,01,250
2,4000,01,250
3,4000,01,250
4,4000,02,250
";
    let finding = duplicate_entries(&derived(csv), AmountBasis::Amount).unwrap();
    assert_eq!(finding.instances, 3);
    assert!(finding.rows.iter().all(|r| r.count == 3 && r.period == "01"));
}

#[test]
fn test_round_amounts_either_sign() {
    let csv = "Journal_ID,GL_Account_Number,Period,Amount
1,4000,01,2000
1,5000,01,-2000
2,4000,01,1999.99
2,5000,01,-1999.99
";
    let finding = round_amount_entries(&derived(csv), AmountBasis::Net).unwrap();
    assert_eq!(finding.instances, 2);
}

#[test]
fn test_late_posting_threshold_is_exclusive() {
    // 2024-04-10 is exactly 100 days after 2024-01-01.
    let csv = "Journal_ID,Document_Date,Entered_Date,Period,Amount
1,2024-04-10,2024-01-01,01,10
2,2024-04-11,2024-01-01,01,10
";
    let finding = late_posting_entries(&derived(csv), AmountBasis::Amount).unwrap();
    assert_eq!(finding.instances, 1);
    assert_eq!(finding.rows[0].document_date, "2024-04-11");
}

#[test]
fn test_late_posting_skips_unreadable_dates() {
    let csv = "Journal_ID,Document_Date,Entered_Date,Period,Amount
1,soon,2024-01-01,01,10
";
    let finding = late_posting_entries(&derived(csv), AmountBasis::Amount).unwrap();
    assert!(finding.is_empty());
}

// ============================================================================
// Timing
// ============================================================================

#[test]
fn test_night_boundaries() {
    let csv = "Journal_ID,Entered_Date,Entered_Time
1,2024-01-03,05:59:59
2,2024-01-03,06:00:00
3,2024-01-03,19:59:59
4,2024-01-03,20:00:00
";
    let finding = night_entries(&derived(csv), ISO_DATETIME_FORMAT).unwrap();
    let hours: Vec<u32> = finding.rows.iter().map(|r| r.hour).collect();
    assert_eq!(hours, vec![5, 20]);
}

#[test]
fn test_weekend_sunday_and_unparsable_rows() {
    let csv = "Journal_ID,Entered_Date,Entered_Time
1,2024-01-07,10:00:00
2,not-a-date,10:00:00
3,2024-01-08,10:00:00
";
    let finding = weekend_entries(&derived(csv), ISO_DATETIME_FORMAT).unwrap();
    assert_eq!(finding.instances, 1);
    assert_eq!(finding.rows[0].weekday, 7);
}

#[test]
fn test_missing_time_defaults_to_midnight() {
    let csv = "Journal_ID,Entered_Date,Entered_Time\n1,2024-01-03,\n";
    let finding = night_entries(&derived(csv), ISO_DATETIME_FORMAT).unwrap();
    assert_eq!(finding.instances, 1);
    assert_eq!(finding.rows[0].hour, 0);
}

// ============================================================================
// Frequency and digits
// ============================================================================

#[test]
fn test_rare_users_threshold() {
    let mut csv = String::from("Journal_ID,GL_Account_Number,Entered_By\n");
    for i in 0..10 {
        csv.push_str(&format!("{},1000,alice\n", i));
    }
    for i in 10..21 {
        csv.push_str(&format!("{},1000,bob\n", i));
    }
    let finding = rare_users(&derived(&csv)).unwrap();
    assert_eq!(finding.instances, 10);
    assert!(finding
        .rows
        .iter()
        .all(|r| r.entered_by.as_deref() == Some("alice")));
}

#[test]
fn test_rare_accounts_needs_user_column() {
    let ledger = derived("Journal_ID,GL_Account_Number\n1,1000\n");
    assert!(matches!(
        rare_accounts(&ledger),
        Err(AuditError::MissingField {
            field: "Entered_By",
            ..
        })
    ));
}

#[test]
fn test_digits_skip_leading_zero() {
    let ledger = derived("Journal_ID,Amount\n1,0.5\n2,0\n3,-123\n4,1.5\n5,900\n6,-900\n");
    let finding = leading_digits(&ledger).unwrap();

    assert_eq!(finding.rows.len(), 9);
    assert_eq!(finding.instances, 4);
    let one = &finding.rows[0];
    assert_eq!((one.digit, one.count), (1, 2));
    assert_eq!(one.percent, Decimal::from(50));
    let nine = &finding.rows[8];
    assert_eq!((nine.digit, nine.count), (9, 2));
    assert!(finding.rows[1..8].iter().all(|r| r.count == 0));
}

#[test]
fn test_digits_empty_ledger() {
    let ledger = derived("Journal_ID,Amount\n");
    let finding = leading_digits(&ledger).unwrap();
    assert_eq!(finding.instances, 0);
    assert!(finding.rows.iter().all(|r| r.percent.is_zero()));
}

// ============================================================================
// Schema, config and engine
// ============================================================================

#[test]
fn test_strict_schema_requires_every_column() {
    let csv = "Document Number,Amount in Doc. Curr.\n1,100\n";
    assert!(Ledger::from_csv(Cursor::new(csv), false).is_ok());
    assert!(matches!(
        Ledger::from_csv(Cursor::new(csv), true),
        Err(AuditError::SchemaMismatch { file: "ledger", ref column })
            if column == "Amount_Credit_Debit_Indicator"
    ));
}

#[test]
fn test_config_rejects_unknown_keys() {
    assert!(matches!(
        AuditConfig::from_toml("datetime_fmt = \"%Y\""),
        Err(AuditError::Config(_))
    ));
    let config = AuditConfig::from_toml("sign_policy = \"presigned\"").unwrap();
    assert_eq!(config.sign_policy, SignPolicy::Presigned);
    assert_eq!(config.datetime_format, COMPACT_DATETIME_FORMAT);
}

#[test]
fn test_report_name_is_sanitized() {
    let engine = AuditEngine::new();
    let ledger = engine
        .load_ledger(Cursor::new("Journal_ID,Amount\n1,10\n1,-10\n"))
        .unwrap();
    let report = engine.run(" ACME / EU ", ledger, None).unwrap();
    assert_eq!(report.client(), "ACME / EU");
    assert_eq!(report.artifact_name(), "report_jet_ACME___EU");
}

#[test]
fn test_log_switches_amount_basis() {
    let gl = "Journal_ID,Amount_Credit_Debit_Indicator,GL_Account_Number,Period,Amount
1,S,4000,01,3000
1,H,5000,01,3000
";
    let engine = AuditEngine::new();

    let without = engine
        .run("ACME", engine.load_ledger(Cursor::new(gl)).unwrap(), None)
        .unwrap();
    // Raw amounts sum to 6000, signed Net to zero.
    assert_eq!(without.incomplete_entries().instances, 1);
    assert_eq!(without.round_amounts().rows[1].basis, AmountBasis::Net);

    let log = engine
        .load_log(Cursor::new("Journal_ID,Total\n1,3000\n"))
        .unwrap();
    let with = engine
        .run(
            "ACME",
            engine.load_ledger(Cursor::new(gl)).unwrap(),
            Some(&log),
        )
        .unwrap();
    assert!(with.incomplete_entries().is_empty());
    assert_eq!(with.round_amounts().rows[1].basis, AmountBasis::Amount);
    assert_eq!(with.instances(CheckName::EntryComparison), Some(0));
}
