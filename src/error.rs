//! Error types for the comms-analysis library.
//!
//! Classification itself never fails for a single message: malformed input is
//! recovered locally. The variants below cover rule compilation, concurrent
//! recompute attempts and the storage/IO edges around the engine.

use thiserror::Error;

/// Errors that can occur while compiling rules, analyzing cases or persisting results.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A pattern definition could not be compiled. Fatal at startup.
    #[error("Rule compilation failed for category '{category}': {reason}")]
    RuleCompilation {
        /// Category whose definition is invalid
        category: String,
        /// What was wrong with it
        reason: String,
    },

    /// A message body could not be analyzed (null body, invalid encoding).
    #[error("Malformed message {message_id}: {reason}")]
    MalformedMessage {
        /// Identifier of the offending message
        message_id: i64,
        /// Why the body was rejected
        reason: String,
    },

    /// A recompute for this case is already running.
    #[error("Recomputation already in progress for case {0}")]
    RecomputationConflict(i64),

    /// Recompute was cancelled between chunks; live derived data is untouched.
    #[error("Recomputation cancelled for case {0}")]
    Cancelled(i64),

    /// Case not found
    #[error("Case not found: {0}")]
    CaseNotFound(i64),

    /// An input record failed validation
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration source errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with `AnalysisError`
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Shorthand for a rule compilation failure.
    pub(crate) fn rule(category: &str, reason: impl Into<String>) -> Self {
        Self::RuleCompilation {
            category: category.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<chrono::ParseError> for AnalysisError {
    fn from(err: chrono::ParseError) -> Self {
        Self::InvalidDate(err.to_string())
    }
}
