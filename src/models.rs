//! Data models for cases, messages and derived analysis
//!
//! Raw evidence (cases, messages, calls) is immutable once stored. Derived
//! records (`MessageAnalysis`, `DailySummary`) are regenerated wholesale from
//! the raw stream whenever the rules change.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Which side of the conversation a message or call came from.
///
/// Matching and suppression never look at this value; it only identifies
/// the two parties when checking for reciprocal banter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent by the case owner
    Sent,
    /// Received from the other party
    Received,
}

impl Direction {
    /// Database/display representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
        }
    }

    /// The opposite party
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Sent => Self::Received,
            Self::Received => Self::Sent,
        }
    }
}

impl FromStr for Direction {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sent" | "outgoing" => Ok(Self::Sent),
            "received" | "incoming" => Ok(Self::Received),
            other => Err(AnalysisError::InvalidRecord(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content a message carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Plain text message
    #[default]
    Text,
    /// Picture attachment
    Image,
    /// Voice note or audio attachment
    Audio,
    /// Call entry in the message stream
    Call,
}

impl MediaType {
    /// Database/display representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Call => "call",
        }
    }
}

impl FromStr for MediaType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "call" => Ok(Self::Call),
            other => Err(AnalysisError::InvalidRecord(format!(
                "unknown media type '{other}'"
            ))),
        }
    }
}

/// Severity tier of a negative pattern category.
///
/// Ordering is `Mild < Moderate < Severe`; an absent severity is modelled as
/// `Option::None`, which sorts below every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Dismissive language, passive aggression
    Mild,
    /// Directed insults, DARVO, contempt
    Moderate,
    /// Threats, coercive control, gaslighting
    Severe,
}

impl Severity {
    /// Database/display representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl FromStr for Severity {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            other => Err(AnalysisError::InvalidRecord(format!(
                "unknown severity '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a category marks harmful or supportive communication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Harmful pattern; carries a severity tier
    Negative,
    /// Positive/supportive marker
    Supportive,
}

/// Outcome of a logged call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Call connected
    #[default]
    Answered,
    /// Call rang out
    Missed,
    /// Call rejected by the callee
    Declined,
}

impl CallStatus {
    /// Database/display representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Missed => "missed",
            Self::Declined => "declined",
        }
    }
}

impl FromStr for CallStatus {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answered" => Ok(Self::Answered),
            "missed" => Ok(Self::Missed),
            "declined" => Ok(Self::Declined),
            other => Err(AnalysisError::InvalidRecord(format!(
                "unknown call status '{other}'"
            ))),
        }
    }
}

/// A case groups all evidence between two parties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Database primary key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Label of the case owner (the `sent` side)
    pub user_label: String,
    /// Label of the other party (the `received` side)
    pub contact_label: String,
    /// First day covered by the case
    pub start_date: Option<NaiveDate>,
    /// Last day covered by the case
    pub end_date: Option<NaiveDate>,
}

/// Data required to create a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCase {
    /// Display name
    pub name: String,
    /// Label of the case owner
    pub user_label: String,
    /// Label of the other party
    pub contact_label: String,
    /// First day covered by the case
    pub start_date: Option<NaiveDate>,
    /// Last day covered by the case
    pub end_date: Option<NaiveDate>,
}

/// Input record for one message, as produced by an ingestion collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Owning case
    pub case_id: i64,
    /// UTC seconds; authoritative ordering key
    pub timestamp: i64,
    /// Calendar date used for daily partitioning
    pub date: NaiveDate,
    /// Clock time, display only (`HH:MM:SS`)
    pub time: String,
    /// Source channel (sms, signal, ...)
    pub source: String,
    /// Which party sent it
    pub direction: Direction,
    /// Text body; absent for media-only messages
    #[serde(default)]
    pub body: Option<String>,
    /// Content kind
    #[serde(default)]
    pub media_type: MediaType,
    /// Duration in seconds for audio/call entries
    #[serde(default)]
    pub duration: Option<i64>,
}

/// A stored message; the unit of classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Database primary key
    pub id: i64,
    /// Owning case
    pub case_id: i64,
    /// UTC seconds
    pub timestamp: i64,
    /// Calendar date
    pub date: NaiveDate,
    /// Clock time
    pub time: String,
    /// Source channel
    pub source: String,
    /// Which party sent it
    pub direction: Direction,
    /// Text body
    pub body: Option<String>,
    /// Content kind
    pub media_type: MediaType,
    /// Duration in seconds where applicable
    pub duration: Option<i64>,
}

impl Message {
    /// Build a text message outside the database, mainly for ad-hoc classification.
    #[must_use]
    pub fn text(id: i64, direction: Direction, body: &str) -> Self {
        Self {
            id,
            case_id: 0,
            timestamp: id,
            date: NaiveDate::default(),
            time: String::new(),
            source: "adhoc".to_string(),
            direction,
            body: Some(body.to_string()),
            media_type: MediaType::Text,
            duration: None,
        }
    }

    /// The body, if present and not blank
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.trim().is_empty())
    }
}

/// Input record for a call-log entry; stored but never classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCall {
    /// Owning case
    pub case_id: i64,
    /// UTC seconds
    pub timestamp: i64,
    /// Calendar date
    pub date: NaiveDate,
    /// Clock time
    pub time: String,
    /// Source channel (phone, signal, ...)
    pub source: String,
    /// Who placed the call
    pub direction: Direction,
    /// Talk time in seconds
    #[serde(default)]
    pub duration: i64,
    /// Call outcome
    #[serde(default)]
    pub status: CallStatus,
}

/// A stored call-log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Database primary key
    pub id: i64,
    /// Owning case
    pub case_id: i64,
    /// UTC seconds
    pub timestamp: i64,
    /// Calendar date
    pub date: NaiveDate,
    /// Clock time
    pub time: String,
    /// Source channel
    pub source: String,
    /// Who placed the call
    pub direction: Direction,
    /// Talk time in seconds
    pub duration: i64,
    /// Call outcome
    pub status: CallStatus,
}

/// Either kind of input record accepted by ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputRecord {
    /// Text or media message
    Message(NewMessage),
    /// Call-log entry
    Call(NewCall),
}

/// Per-message classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAnalysis {
    /// The analyzed message
    pub message_id: i64,
    /// True iff at least one negative match survived suppression
    pub is_hurtful: bool,
    /// Highest surviving tier, absent when nothing survived
    pub severity: Option<Severity>,
    /// The message's own body contains apology language
    pub is_apology: bool,
    /// Sentiment score; neutral 0.0 unless a scorer is plugged in
    pub sentiment_score: f64,
    /// Surviving negative category names, in rule order, de-duplicated
    pub patterns: Vec<String>,
    /// Literal matched substrings of surviving negative matches
    pub keywords: Vec<String>,
    /// Supportive category names, in rule order, de-duplicated
    pub supportive: Vec<String>,
}

impl MessageAnalysis {
    /// The analysis of a message with nothing to classify
    #[must_use]
    pub const fn empty(message_id: i64) -> Self {
        Self {
            message_id,
            is_hurtful: false,
            severity: None,
            is_apology: false,
            sentiment_score: 0.0,
            patterns: Vec::new(),
            keywords: Vec::new(),
            supportive: Vec::new(),
        }
    }
}

/// Per-day roll-up of a case's analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Owning case
    pub case_id: i64,
    /// Day summarized
    pub date: NaiveDate,
    /// Messages on that day
    pub msg_count: u32,
    /// Mean sentiment of those messages
    pub avg_sentiment: f64,
    /// Messages flagged hurtful
    pub hurtful_count: u32,
    /// Distinct negative pattern labels seen that day
    pub patterns_count: u32,
}

/// Per-day call statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCallSummary {
    /// Day summarized
    pub date: NaiveDate,
    /// Calls placed by the case owner
    pub outgoing: u32,
    /// Calls received from the other party
    pub incoming: u32,
    /// Calls with status missed or declined
    pub missed: u32,
    /// Sum of talk time
    pub total_seconds: i64,
}

/// Output format for exported results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(AnalysisError::InvalidConfig(format!(
                "unsupported output format '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Severe > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Mild);
        assert!(Some(Severity::Mild) > None);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("sent".parse::<Direction>().ok(), Some(Direction::Sent));
        assert_eq!("Incoming".parse::<Direction>().ok(), Some(Direction::Received));
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Sent.flipped(), Direction::Received);
    }

    #[test]
    fn test_input_record_tagging() {
        let json = r#"{"kind":"message","case_id":1,"timestamp":10,"date":"2024-01-02",
            "time":"10:00:00","source":"sms","direction":"received","body":"hi"}"#;
        let record: InputRecord = serde_json::from_str(json).expect("Failed to parse record");
        match record {
            InputRecord::Message(m) => {
                assert_eq!(m.media_type, MediaType::Text);
                assert_eq!(m.body.as_deref(), Some("hi"));
            }
            InputRecord::Call(_) => panic!("expected a message record"),
        }
    }

    #[test]
    fn test_blank_body_is_not_text() {
        let mut message = Message::text(1, Direction::Sent, "   ");
        assert!(message.text_body().is_none());
        message.body = None;
        assert!(message.text_body().is_none());
    }
}
