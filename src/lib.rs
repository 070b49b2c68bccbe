//! Comms Analysis - Communication Pattern Classification
//!
//! A Rust library for classifying messages between two parties against a
//! catalog of behavioral pattern rules, suppressing false positives with
//! conversational context, and rolling the results up per day.
//!
//! # Features
//!
//! - Immutable, validated pattern catalog compiled once at startup
//! - Context filters (apology, banter, jokes, venting, ...) over a message arena
//! - Parallel, idempotent classification with severity resolution
//! - Daily summaries, communication gaps and relationship health
//! - SQLite persistence with chunked, cancellable recompute

/// Daily aggregation, call summaries and gap detection
pub mod aggregator;
/// Built-in pattern catalog
pub mod catalog;
/// Per-message classification
pub mod classifier;
/// Configuration management
pub mod config;
/// Context windows and suppression filters
pub mod context;
/// Database operations and connection pooling
pub mod db;
/// Whole-case classification and aggregation
pub mod engine;
/// Error types
pub mod error;
/// Export to CSV and JSON
pub mod file_writer;
/// Positive-to-negative balance
pub mod health;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Input record sources and ingestion
pub mod repository;
/// Compiled pattern rules
pub mod rules;
/// Database schema definitions
pub mod schema;
/// Recompute orchestration
pub mod service;
/// Body normalization
pub mod text;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use classifier::{MessageClassifier, SeverityResolver};
pub use context::{ContextFilterBank, ContextSignal, ContextWindow};
pub use db::Database;
pub use engine::AnalysisEngine;
pub use error::{AnalysisError, Result};
pub use models::{DailySummary, Message, MessageAnalysis, OutputFormat, Severity};
pub use rules::{PatternCategory, RuleSet};
