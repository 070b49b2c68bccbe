//! Exporting derived results

use std::fs;

use chrono::NaiveDate;
use comms_analysis::file_writer::export_case;
use comms_analysis::models::{DailySummary, MessageAnalysis, OutputFormat, Severity};
use tempfile::TempDir;

fn fixtures() -> (Vec<MessageAnalysis>, Vec<DailySummary>) {
    let mut hurtful = MessageAnalysis::empty(2);
    hurtful.is_hurtful = true;
    hurtful.severity = Some(Severity::Severe);
    hurtful.patterns = vec!["gaslighting".to_string()];
    hurtful.keywords = vec!["you're crazy".to_string()];

    let mut kind = MessageAnalysis::empty(3);
    kind.supportive = vec!["gratitude".to_string(), "affection".to_string()];

    let summary = DailySummary {
        case_id: 9,
        date: NaiveDate::from_ymd_opt(2025, 2, 14).expect("valid date"),
        msg_count: 3,
        avg_sentiment: 0.0,
        hurtful_count: 1,
        patterns_count: 1,
    };
    (vec![MessageAnalysis::empty(1), hurtful, kind], vec![summary])
}

#[test]
fn test_csv_export() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let out = dir.path().join("nested").join("out");
    let (analyses, summaries) = fixtures();

    let files = export_case(9, &analyses, &summaries, OutputFormat::Csv, &out).expect("Failed to export");
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("case_9_analysis.csv"));
    assert!(files[1].ends_with("case_9_daily.csv"));

    let analysis_csv = fs::read_to_string(&files[0]).expect("Failed to read export");
    let lines: Vec<&str> = analysis_csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("message_id,is_hurtful,severity"));
    assert_eq!(lines[2], "2,true,severe,false,0,gaslighting,you're crazy,");
    assert!(lines[3].ends_with("gratitude;affection"));

    let daily_csv = fs::read_to_string(&files[1]).expect("Failed to read export");
    assert!(daily_csv.starts_with("case_id,date,msg_count"));
    assert!(daily_csv.contains("9,2025-02-14,3,"));
}

#[test]
fn test_json_export() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (analyses, summaries) = fixtures();

    let files = export_case(9, &analyses, &summaries, OutputFormat::Json, dir.path()).expect("Failed to export");
    let raw = fs::read_to_string(&files[0]).expect("Failed to read export");
    let parsed: Vec<MessageAnalysis> = serde_json::from_str(&raw).expect("Failed to parse export");
    assert_eq!(parsed, analyses);

    let raw = fs::read_to_string(&files[1]).expect("Failed to read export");
    let parsed: Vec<DailySummary> = serde_json::from_str(&raw).expect("Failed to parse export");
    assert_eq!(parsed, summaries);
}

#[test]
fn test_empty_export_still_writes_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let files = export_case(1, &[], &[], OutputFormat::Csv, dir.path()).expect("Failed to export");
    for file in files {
        assert!(file.exists());
    }
}
