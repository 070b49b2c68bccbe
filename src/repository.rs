use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{AnalysisError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{InputRecord, NewCall, NewMessage};
use crate::validation::InputValidator;

/// Where input records come from.
///
/// Ingestion collaborators (exporters, parsers) hand the engine records in
/// the common input shape; the engine never parses vendor formats itself.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read every record the source holds
    async fn fetch_records(&self) -> Result<Vec<InputRecord>>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// A JSON file holding an array of input records
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_records(&self) -> Result<Vec<InputRecord>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Records already in memory
pub struct InMemorySource {
    records: Vec<InputRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<InputRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_records(&self) -> Result<Vec<InputRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub messages: usize,
    pub calls: usize,
    pub rejected: usize,
}

/// Validate records from `source` and store them under `case_id`.
///
/// Invalid records are skipped and counted; one bad line never aborts the
/// batch. Fails with `CaseNotFound` when the case does not exist.
pub async fn ingest(db: &Database, case_id: i64, source: &dyn RecordSource) -> Result<IngestReport> {
    db.require_case(case_id)?;
    let records = source.fetch_records().await?;
    let metrics = MetricsCollector::default();

    let mut messages: Vec<NewMessage> = Vec::new();
    let mut calls: Vec<NewCall> = Vec::new();
    let mut rejected = 0;

    for (index, record) in records.into_iter().enumerate() {
        match InputValidator::validate_record(&record, case_id) {
            Ok(()) => match record {
                InputRecord::Message(m) => messages.push(m),
                InputRecord::Call(c) => calls.push(c),
            },
            Err(e) => {
                warn!(index, error = %e, "Rejected input record");
                metrics.record_error("invalid_record", "ingest");
                rejected += 1;
            }
        }
    }

    let report = IngestReport {
        messages: db.add_messages(&messages)?,
        calls: db.add_calls(&calls)?,
        rejected,
    };
    metrics.record_ingest(report.messages, "message");
    metrics.record_ingest(report.calls, "call");

    info!(
        case_id,
        source = %source.describe(),
        messages = report.messages,
        calls = report.calls,
        rejected = report.rejected,
        "Ingested records"
    );

    if report.messages + report.calls == 0 && report.rejected > 0 {
        return Err(AnalysisError::InvalidRecord(format!(
            "all {} records from {} were rejected",
            report.rejected,
            source.describe()
        )));
    }

    Ok(report)
}
