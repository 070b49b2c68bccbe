use std::time::Duration;

use anyhow::Result;
use metrics::{counter, gauge, histogram};

use crate::models::MessageAnalysis;

/// Metrics collection and management
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    // Classification metrics
    pub messages_classified_total: &'static str,
    pub messages_hurtful_total: &'static str,
    pub matches_suppressed_total: &'static str,
    pub messages_malformed_total: &'static str,

    // Recompute metrics
    pub recompute_total: &'static str,
    pub recompute_duration: &'static str,
    pub recompute_chunk_messages: &'static str,
    pub summaries_written_total: &'static str,
    pub recompute_in_flight: &'static str,

    // Ingestion and export metrics
    pub records_ingested_total: &'static str,
    pub rows_exported_total: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            messages_classified_total: "comms_messages_classified_total",
            messages_hurtful_total: "comms_messages_hurtful_total",
            matches_suppressed_total: "comms_matches_suppressed_total",
            messages_malformed_total: "comms_messages_malformed_total",

            recompute_total: "comms_recompute_total",
            recompute_duration: "comms_recompute_duration_seconds",
            recompute_chunk_messages: "comms_recompute_chunk_messages",
            summaries_written_total: "comms_summaries_written_total",
            recompute_in_flight: "comms_recompute_in_flight",

            records_ingested_total: "comms_records_ingested_total",
            rows_exported_total: "comms_rows_exported_total",

            errors_total: "comms_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Install a no-op recorder so metric calls are cheap when no exporter is configured
    pub fn init() -> Result<()> {
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|e| anyhow::anyhow!("Failed to initialize metrics recorder: {}", e))?;

        Ok(())
    }

    /// Record one classified message
    pub fn record_classification(&self, analysis: &MessageAnalysis) {
        counter!(self.messages_classified_total).increment(1);
        if let Some(severity) = analysis.severity {
            counter!(self.messages_hurtful_total, "severity" => severity.as_str()).increment(1);
        }
    }

    /// Record a negative match discarded by a context filter
    pub fn record_suppression(&self, category: &str, signal: &'static str) {
        counter!(
            self.matches_suppressed_total,
            "category" => category.to_string(),
            "signal" => signal
        )
        .increment(1);
    }

    /// Record a message that could not be classified
    pub fn record_malformed(&self) {
        counter!(self.messages_malformed_total).increment(1);
    }

    /// Record a chunk of messages processed during recompute
    pub fn record_chunk(&self, messages: usize) {
        #[allow(clippy::cast_precision_loss)]
        histogram!(self.recompute_chunk_messages).record(messages as f64);
    }

    /// Record a finished recompute
    pub fn record_recompute(&self, outcome: &'static str, duration: Duration, summaries: usize) {
        counter!(self.recompute_total, "outcome" => outcome).increment(1);
        histogram!(self.recompute_duration, "outcome" => outcome).record(duration.as_secs_f64());
        counter!(self.summaries_written_total).increment(summaries as u64);
    }

    /// Update the number of recomputes currently running
    pub fn set_in_flight(&self, count: usize) {
        #[allow(clippy::cast_precision_loss)]
        gauge!(self.recompute_in_flight).set(count as f64);
    }

    /// Record ingested input records
    pub fn record_ingest(&self, count: usize, kind: &'static str) {
        counter!(self.records_ingested_total, "kind" => kind).increment(count as u64);
    }

    /// Record exported rows
    pub fn record_export(&self, count: usize, format: &'static str) {
        counter!(self.rows_exported_total, "format" => format).increment(count as u64);
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &'static str, operation: &'static str) {
        counter!(self.errors_total, "type" => error_type, "operation" => operation).increment(1);
    }
}

/// Times an operation and records it as a recompute on completion
pub struct MetricsTimer {
    collector: MetricsCollector,
    start: std::time::Instant,
}

impl MetricsTimer {
    /// Start timing
    #[must_use]
    pub fn new(collector: MetricsCollector) -> Self {
        Self {
            collector,
            start: std::time::Instant::now(),
        }
    }

    /// Stop timing and record the outcome
    pub fn finish(self, outcome: &'static str, summaries: usize) -> Duration {
        let duration = self.start.elapsed();
        self.collector.record_recompute(outcome, duration, summaries);
        duration
    }
}
