//! Case-level orchestration: chunked recompute with shadow tables, and the
//! read-side report built from the derived data.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{self, CommunicationGap};
use crate::config::AnalysisConfig;
use crate::db::Database;
use crate::engine::AnalysisEngine;
use crate::error::{AnalysisError, Result};
use crate::health::{self, HealthReport};
use crate::logging::OperationTimer;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::models::{Case, DailyCallSummary, DailySummary};

/// Cooperative cancellation flag, checked between chunks
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running recompute to stop at the next chunk boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a finished recompute produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecomputeReport {
    pub case_id: i64,
    pub chunks: usize,
    pub analyses: usize,
    pub summaries: usize,
    pub duration_ms: u128,
}

/// Everything the `summary` command shows for a case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub case: Case,
    pub summaries: Vec<DailySummary>,
    pub calls: Vec<DailyCallSummary>,
    pub gaps: Vec<CommunicationGap>,
    pub health: HealthReport,
}

/// Split ascending dates into runs spanning at most `chunk_days` calendar days
#[must_use]
pub fn plan_chunks(dates: &[NaiveDate], chunk_days: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let span = Duration::days(i64::from(chunk_days.max(1)));
    let mut chunks: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for &date in dates {
        match chunks.last_mut() {
            Some((start, end)) if date - *start < span => *end = date,
            _ => chunks.push((date, date)),
        }
    }
    chunks
}

struct InFlightGuard<'a> {
    registry: &'a Mutex<HashSet<i64>>,
    case_id: i64,
    metrics: MetricsCollector,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut running = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        running.remove(&self.case_id);
        self.metrics.set_in_flight(running.len());
    }
}

/// Runs recomputes against the database, one at a time per case
pub struct AnalysisService {
    db: Arc<Database>,
    engine: AnalysisEngine,
    chunk_days: u32,
    context_padding: usize,
    in_flight: Mutex<HashSet<i64>>,
    metrics: MetricsCollector,
}

impl AnalysisService {
    pub fn new(db: Arc<Database>, engine: AnalysisEngine, settings: &AnalysisConfig) -> Self {
        // padding narrower than the filters would change edge results
        let context_padding = settings.context_padding.max(engine.context_radius());
        Self {
            db,
            engine,
            chunk_days: settings.chunk_days,
            context_padding,
            in_flight: Mutex::new(HashSet::new()),
            metrics: MetricsCollector::default(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    fn acquire(&self, case_id: i64) -> Result<InFlightGuard<'_>> {
        let mut running = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(case_id) {
            return Err(AnalysisError::RecomputationConflict(case_id));
        }
        self.metrics.set_in_flight(running.len());
        Ok(InFlightGuard {
            registry: &self.in_flight,
            case_id,
            metrics: self.metrics,
        })
    }

    /// Recompute every analysis and summary of a case.
    ///
    /// Results are staged chunk by chunk and become visible in one swap at
    /// the end. On error or cancellation the staged rows are dropped and the
    /// previous results stay live.
    pub fn recompute_case(&self, case_id: i64, cancel: &CancelToken) -> Result<RecomputeReport> {
        self.recompute_case_with_progress(case_id, cancel, &mut |_| {})
    }

    /// Like [`Self::recompute_case`], calling `on_chunk` with the number of
    /// chunks staged so far after each one.
    pub fn recompute_case_with_progress(
        &self,
        case_id: i64,
        cancel: &CancelToken,
        on_chunk: &mut dyn FnMut(usize),
    ) -> Result<RecomputeReport> {
        self.db.require_case(case_id)?;
        let _guard = self.acquire(case_id)?;
        let timer = MetricsTimer::new(self.metrics);
        let phase = OperationTimer::for_case("recompute", case_id);

        // leftovers from an interrupted run
        self.db.discard_shadow(case_id)?;

        match self.stage_and_swap(case_id, cancel, on_chunk) {
            Ok((chunks, analyses, summaries)) => {
                timer.finish("success", summaries);
                let duration_ms = phase.finish();
                info!(case_id, chunks, analyses, summaries, "Recompute finished");
                Ok(RecomputeReport {
                    case_id,
                    chunks,
                    analyses,
                    summaries,
                    duration_ms,
                })
            }
            Err(e) => {
                if let Err(cleanup) = self.db.discard_shadow(case_id) {
                    warn!(case_id, error = %cleanup, "Failed to discard staged rows");
                }
                let outcome = if matches!(e, AnalysisError::Cancelled(_)) {
                    "cancelled"
                } else {
                    self.metrics.record_error("recompute_failed", "recompute");
                    "error"
                };
                timer.finish(outcome, 0);
                warn!(case_id, error = %e, "Recompute aborted; previous results kept");
                Err(e)
            }
        }
    }

    fn stage_and_swap(
        &self,
        case_id: i64,
        cancel: &CancelToken,
        on_chunk: &mut dyn FnMut(usize),
    ) -> Result<(usize, usize, usize)> {
        let dates = self.db.message_dates(case_id)?;
        let plan = plan_chunks(&dates, self.chunk_days);
        debug!(case_id, chunks = plan.len(), days = dates.len(), "Planned recompute");

        for (staged, &(start, end)) in plan.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled(case_id));
            }

            let chunk = self.db.load_chunk(case_id, start, end, self.context_padding)?;
            let core = &chunk.messages[chunk.core.clone()];
            let analyses = self.engine.classify_range(&chunk.messages, chunk.core.clone());
            let summaries = aggregator::aggregate(core, &analyses);
            self.metrics.record_chunk(core.len());
            debug!(case_id, %start, %end, messages = core.len(), "Staging chunk");

            self.db.stage_chunk(case_id, &analyses, &summaries)?;
            on_chunk(staged + 1);
        }

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled(case_id));
        }

        let (analyses, summaries) = self.db.swap_shadow(case_id)?;
        Ok((plan.len(), analyses, summaries))
    }

    /// Run [`Self::recompute_case`] on the blocking pool
    pub async fn recompute_in_background(
        self: &Arc<Self>,
        case_id: i64,
        cancel: CancelToken,
    ) -> Result<RecomputeReport> {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || service.recompute_case(case_id, &cancel))
            .await
            .map_err(|e| AnalysisError::Other(format!("Recompute task failed: {e}")))?
    }

    /// Build the read-side report from stored derived data
    pub fn case_report(&self, case_id: i64) -> Result<CaseReport> {
        let case = self.db.require_case(case_id)?;
        let summaries = self.db.summaries_for_case(case_id)?;
        let messages = self.db.messages_for_case(case_id)?;
        let analyses = self.db.analyses_for_case(case_id)?;
        let calls = aggregator::summarize_calls(&self.db.calls_for_case(case_id)?);
        let gaps = aggregator::find_gaps(&summaries, &calls);
        let health = health::assess(self.engine.classifier().rules(), &messages, &analyses);

        Ok(CaseReport {
            case,
            summaries,
            calls,
            gaps,
            health,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
    }

    #[test]
    fn test_plan_chunks() {
        let dates = [d(1), d(2), d(5), d(8), d(9), d(20)];
        assert_eq!(
            plan_chunks(&dates, 7),
            vec![(d(1), d(5)), (d(8), d(9)), (d(20), d(20))]
        );
        assert!(plan_chunks(&[], 7).is_empty());
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
