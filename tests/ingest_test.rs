//! Record ingestion from files and memory

use std::fs;

use chrono::NaiveDate;
use comms_analysis::db::Database;
use comms_analysis::models::{Direction, InputRecord, MediaType, NewCase, NewMessage};
use comms_analysis::repository::{ingest, InMemorySource, JsonFileSource, RecordSource};
use comms_analysis::AnalysisError;
use tempfile::TempDir;

fn setup() -> (TempDir, Database, i64) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::new(dir.path().join("ingest.db").to_str().expect("utf-8 path"))
        .expect("Failed to open database");
    let case_id = db
        .create_case(&NewCase {
            name: "ingest".to_string(),
            user_label: "me".to_string(),
            contact_label: "them".to_string(),
            start_date: None,
            end_date: None,
        })
        .expect("Failed to create case")
        .id;
    (dir, db, case_id)
}

fn message(case_id: i64, timestamp: i64, body: &str) -> InputRecord {
    InputRecord::Message(NewMessage {
        case_id,
        timestamp,
        date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        time: "08:00:00".to_string(),
        source: "sms".to_string(),
        direction: Direction::Sent,
        body: Some(body.to_string()),
        media_type: MediaType::Text,
        duration: None,
    })
}

#[tokio::test]
async fn test_ingest_json_file() {
    let (dir, db, case_id) = setup();
    let path = dir.path().join("records.json");
    let json = format!(
        r#"[
  {{"kind": "message", "case_id": {case_id}, "timestamp": 1735718400, "date": "2025-01-01",
    "time": "08:00:00", "source": "sms", "direction": "sent", "body": "morning"}},
  {{"kind": "message", "case_id": {case_id}, "timestamp": 1735718460, "date": "2025-01-01",
    "time": "08:01:00", "source": "sms", "direction": "received", "media_type": "image"}},
  {{"kind": "call", "case_id": {case_id}, "timestamp": 1735722000, "date": "2025-01-01",
    "time": "09:00:00", "source": "phone", "direction": "received", "duration": 300,
    "status": "answered"}}
]"#
    );
    fs::write(&path, json).expect("Failed to write records");

    let source = JsonFileSource::new(&path);
    assert_eq!(source.describe(), path.display().to_string());
    let report = ingest(&db, case_id, &source).await.expect("Failed to ingest");

    assert_eq!(report.messages, 2);
    assert_eq!(report.calls, 1);
    assert_eq!(report.rejected, 0);

    let messages = db.messages_for_case(case_id).expect("Failed to read messages");
    assert_eq!(messages[0].body.as_deref(), Some("morning"));
    assert_eq!(messages[1].media_type, MediaType::Image);
    assert!(messages[1].body.is_none());
    assert_eq!(db.calls_for_case(case_id).expect("Failed to read calls")[0].duration, 300);
}

#[tokio::test]
async fn test_invalid_records_are_skipped() {
    let (_dir, db, case_id) = setup();
    let source = InMemorySource::new(vec![
        message(case_id, 100, "first"),
        message(case_id, -5, "negative timestamp"),
        message(case_id + 1, 200, "other case"),
        message(case_id, 300, "last"),
    ]);

    let report = ingest(&db, case_id, &source).await.expect("Failed to ingest");
    assert_eq!(report.messages, 2);
    assert_eq!(report.rejected, 2);
    assert_eq!(db.messages_for_case(case_id).expect("Failed to read").len(), 2);
}

#[tokio::test]
async fn test_all_rejected_is_an_error() {
    let (_dir, db, case_id) = setup();
    let source = InMemorySource::new(vec![message(case_id, -1, "bad")]);
    let result = ingest(&db, case_id, &source).await;
    assert!(matches!(result, Err(AnalysisError::InvalidRecord(_))));
}

#[tokio::test]
async fn test_unknown_case_is_rejected() {
    let (_dir, db, case_id) = setup();
    let source = InMemorySource::new(vec![message(case_id, 1, "hi")]);
    let result = ingest(&db, case_id + 100, &source).await;
    assert!(matches!(result, Err(AnalysisError::CaseNotFound(_))));
}

#[tokio::test]
async fn test_malformed_json_fails() {
    let (dir, db, case_id) = setup();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"kind\": \"fax\"}]").expect("Failed to write records");
    let result = ingest(&db, case_id, &JsonFileSource::new(&path)).await;
    assert!(matches!(result, Err(AnalysisError::Serialization(_))));
}
