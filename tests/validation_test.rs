//! Input record validation

use std::path::Path;

use chrono::NaiveDate;
use comms_analysis::models::{
    CallStatus, Direction, InputRecord, MediaType, NewCall, NewMessage,
};
use comms_analysis::validation::InputValidator;
use comms_analysis::AnalysisError;

fn message() -> NewMessage {
    NewMessage {
        case_id: 1,
        timestamp: 1_735_732_800,
        date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        time: "12:00:00".to_string(),
        source: "sms".to_string(),
        direction: Direction::Received,
        body: Some("hello".to_string()),
        media_type: MediaType::Text,
        duration: None,
    }
}

fn call() -> NewCall {
    NewCall {
        case_id: 1,
        timestamp: 1_735_732_800,
        date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        time: "12:00".to_string(),
        source: "phone".to_string(),
        direction: Direction::Sent,
        duration: 42,
        status: CallStatus::Answered,
    }
}

#[test]
fn test_valid_records() {
    assert!(InputValidator::validate_record(&InputRecord::Message(message()), 1).is_ok());
    assert!(InputValidator::validate_record(&InputRecord::Call(call()), 1).is_ok());
}

#[test]
fn test_record_for_other_case() {
    let err = InputValidator::validate_record(&InputRecord::Message(message()), 2)
        .expect_err("case mismatch");
    assert!(matches!(err, AnalysisError::InvalidRecord(_)));
}

#[test]
fn test_bad_fields() {
    let mut m = message();
    m.timestamp = -1;
    assert!(InputValidator::validate_message(&m).is_err());

    let mut m = message();
    m.time = "noon".to_string();
    assert!(InputValidator::validate_message(&m).is_err());

    let mut m = message();
    m.duration = Some(-5);
    assert!(InputValidator::validate_message(&m).is_err());

    let mut c = call();
    c.duration = -1;
    assert!(InputValidator::validate_call(&c).is_err());

    let mut c = call();
    c.source = "x".repeat(51);
    assert!(InputValidator::validate_call(&c).is_err());
}

#[test]
fn test_body_content_is_not_validated() {
    let mut m = message();
    m.body = Some("broken \u{FFFD} bytes".to_string());
    assert!(InputValidator::validate_message(&m).is_ok());

    m.body = None;
    m.media_type = MediaType::Image;
    assert!(InputValidator::validate_message(&m).is_ok());
}

#[test]
fn test_labels_and_dates() {
    assert!(InputValidator::validate_label("name", "Case 1").is_ok());
    assert!(InputValidator::validate_label("name", "  ").is_err());
    assert!(InputValidator::validate_label("name", &"a".repeat(101)).is_err());
    assert!(InputValidator::validate_label("name", "two\nlines").is_err());

    let start = InputValidator::parse_date("2025-01-01").expect("valid date");
    let end = InputValidator::parse_date("2024-12-31").expect("valid date");
    assert!(matches!(
        InputValidator::validate_date_range(Some(start), Some(end)),
        Err(AnalysisError::InvalidDate(_))
    ));
    assert!(InputValidator::validate_date_range(Some(end), Some(start)).is_ok());
    assert!(InputValidator::validate_date_range(None, Some(start)).is_ok());
    assert!(matches!(
        InputValidator::parse_date("01/02/2025"),
        Err(AnalysisError::InvalidDate(_))
    ));
}

#[test]
fn test_paths_and_sanitizing() {
    assert!(InputValidator::validate_file_path(Path::new("out/reports")).is_ok());
    assert!(InputValidator::validate_file_path(Path::new("../etc")).is_err());
    assert!(InputValidator::validate_file_path(Path::new("")).is_err());

    assert_eq!(InputValidator::sanitize_text("  Alex\u{7}  "), "Alex");
}
