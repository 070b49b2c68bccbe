//! Database schema definitions
//!
//! Table and column names used by the rusqlite queries in [`crate::db`].
//! The derived tables each have a `_shadow` twin with the same columns that
//! recompute stages into before the swap.

/// Cases table schema
pub mod cases {
    /// Table name
    pub const TABLE: &str = "cases";
    /// Primary key column
    pub const ID: &str = "id";
    /// Display name column
    pub const NAME: &str = "name";
    /// Label of the case owner
    pub const USER_LABEL: &str = "user_label";
    /// Label of the other party
    pub const CONTACT_LABEL: &str = "contact_label";
    /// First covered day
    pub const START_DATE: &str = "start_date";
    /// Last covered day
    pub const END_DATE: &str = "end_date";
}

/// Messages table schema
pub mod messages {
    /// Table name
    pub const TABLE: &str = "messages";
    /// Primary key column
    pub const ID: &str = "id";
    /// Foreign key to cases
    pub const CASE_ID: &str = "case_id";
    /// UTC seconds
    pub const TIMESTAMP: &str = "timestamp";
    /// Calendar date (`YYYY-MM-DD`)
    pub const DATE: &str = "date";
    /// Clock time
    pub const TIME: &str = "time";
    /// Source channel
    pub const SOURCE: &str = "source";
    /// `sent` or `received`
    pub const DIRECTION: &str = "direction";
    /// Text body, nullable
    pub const BODY: &str = "body";
    /// Content kind
    pub const MEDIA_TYPE: &str = "media_type";
    /// Duration in seconds, nullable
    pub const DURATION: &str = "duration";
}

/// Call log table schema
pub mod calls {
    /// Table name
    pub const TABLE: &str = "calls";
    /// Primary key column
    pub const ID: &str = "id";
    /// Foreign key to cases
    pub const CASE_ID: &str = "case_id";
    /// UTC seconds
    pub const TIMESTAMP: &str = "timestamp";
    /// Calendar date
    pub const DATE: &str = "date";
    /// Clock time
    pub const TIME: &str = "time";
    /// Source channel
    pub const SOURCE: &str = "source";
    /// Who placed the call
    pub const DIRECTION: &str = "direction";
    /// Talk time in seconds
    pub const DURATION: &str = "duration";
    /// Call outcome
    pub const STATUS: &str = "status";
}

/// Per-message analysis schema
pub mod message_analysis {
    /// Table name
    pub const TABLE: &str = "message_analysis";
    /// Shadow table name
    pub const SHADOW: &str = "message_analysis_shadow";
    /// Primary key and foreign key to messages
    pub const MESSAGE_ID: &str = "message_id";
    /// Foreign key to cases
    pub const CASE_ID: &str = "case_id";
    /// Hurtful flag
    pub const IS_HURTFUL: &str = "is_hurtful";
    /// Severity tier, nullable
    pub const SEVERITY: &str = "severity";
    /// Apology flag
    pub const IS_APOLOGY: &str = "is_apology";
    /// Sentiment score
    pub const SENTIMENT_SCORE: &str = "sentiment_score";
    /// JSON array of negative pattern labels
    pub const PATTERNS: &str = "patterns";
    /// JSON array of matched keywords
    pub const KEYWORDS: &str = "keywords";
    /// JSON array of supportive pattern labels
    pub const SUPPORTIVE: &str = "supportive";
}

/// Daily summary schema
pub mod daily_summary {
    /// Table name
    pub const TABLE: &str = "daily_summary";
    /// Shadow table name
    pub const SHADOW: &str = "daily_summary_shadow";
    /// Foreign key to cases
    pub const CASE_ID: &str = "case_id";
    /// Summarized day
    pub const DATE: &str = "date";
    /// Message count
    pub const MSG_COUNT: &str = "msg_count";
    /// Mean sentiment
    pub const AVG_SENTIMENT: &str = "avg_sentiment";
    /// Hurtful message count
    pub const HURTFUL_COUNT: &str = "hurtful_count";
    /// Distinct pattern label count
    pub const PATTERNS_COUNT: &str = "patterns_count";
}
