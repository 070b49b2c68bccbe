use chrono::{NaiveDate, NaiveTime};
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::{InputRecord, NewCall, NewMessage};

const MAX_LABEL_LEN: usize = 100;
const MAX_SOURCE_LEN: usize = 50;

fn invalid(msg: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidRecord(msg.into())
}

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a case name or party label
    pub fn validate_label(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(invalid(format!("{field} cannot be empty")));
        }

        if value.chars().count() > MAX_LABEL_LEN {
            return Err(invalid(format!(
                "{field} too long (max {MAX_LABEL_LEN} characters)"
            )));
        }

        if value.contains(['\0', '\r', '\n']) {
            return Err(invalid(format!("{field} contains invalid characters")));
        }

        Ok(())
    }

    /// Parse a `YYYY-MM-DD` date
    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|e| AnalysisError::InvalidDate(format!("'{value}': {e}")))
    }

    /// Validate date range
    pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        if let (Some(start_date), Some(end_date)) = (start, end) {
            if start_date > end_date {
                return Err(AnalysisError::InvalidDate(
                    "Start date cannot be after end date".into(),
                ));
            }

            let days = (end_date - start_date).num_days();
            if days > 365 * 5 {
                tracing::warn!(
                    "Large date range ({} days / {:.1} years) may slow down recompute",
                    days,
                    days as f64 / 365.0
                );
            }
        }

        Ok(())
    }

    /// Validate an export path
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(invalid("File path cannot be empty"));
        }

        // Check for path traversal attempts
        if path_str.contains("..") {
            return Err(invalid("File path contains potentially dangerous characters"));
        }

        if path_str.len() > 4096 {
            return Err(invalid("File path too long (max 4096 characters)"));
        }

        Ok(())
    }

    fn validate_common(timestamp: i64, time: &str, source: &str) -> Result<()> {
        if timestamp < 0 {
            return Err(invalid(format!("timestamp {timestamp} is negative")));
        }

        if !time.is_empty()
            && NaiveTime::parse_from_str(time, "%H:%M:%S").is_err()
            && NaiveTime::parse_from_str(time, "%H:%M").is_err()
        {
            return Err(invalid(format!("time '{time}' is not HH:MM[:SS]")));
        }

        if source.len() > MAX_SOURCE_LEN {
            return Err(invalid(format!(
                "source too long (max {MAX_SOURCE_LEN} characters)"
            )));
        }

        Ok(())
    }

    /// Validate a message record.
    ///
    /// Body content is not checked here; unreadable bodies are stored as-is and
    /// come out of classification as empty analyses.
    pub fn validate_message(message: &NewMessage) -> Result<()> {
        Self::validate_common(message.timestamp, &message.time, &message.source)?;

        if message.duration.is_some_and(|d| d < 0) {
            return Err(invalid("duration cannot be negative"));
        }

        Ok(())
    }

    /// Validate a call-log record
    pub fn validate_call(call: &NewCall) -> Result<()> {
        Self::validate_common(call.timestamp, &call.time, &call.source)?;

        if call.duration < 0 {
            return Err(invalid("duration cannot be negative"));
        }

        Ok(())
    }

    /// Validate any input record and check it belongs to `case_id`
    pub fn validate_record(record: &InputRecord, case_id: i64) -> Result<()> {
        let owner = match record {
            InputRecord::Message(m) => {
                Self::validate_message(m)?;
                m.case_id
            }
            InputRecord::Call(c) => {
                Self::validate_call(c)?;
                c.case_id
            }
        };

        if owner != case_id {
            return Err(invalid(format!(
                "record belongs to case {owner}, expected {case_id}"
            )));
        }

        Ok(())
    }

    /// Sanitize a label for display
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
