//! The classification engine: windowed classification over a message arena
//! plus daily aggregation.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::Arc;
use std::thread;

use tracing::{debug, instrument};

use crate::aggregator;
use crate::classifier::MessageClassifier;
use crate::context::{ContextFilterBank, ContextWindow, FilterSettings};
use crate::error::Result;
use crate::models::{DailySummary, Message, MessageAnalysis};
use crate::rules::RuleSet;

/// Messages classified per worker before another thread is worth spawning
const MIN_MESSAGES_PER_WORKER: usize = 256;

/// Stateless classification and aggregation over ordered messages
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    classifier: MessageClassifier,
    workers: NonZeroUsize,
}

impl AnalysisEngine {
    /// Build an engine from compiled rules and filters.
    ///
    /// `workers == 0` uses the available parallelism.
    #[must_use]
    pub fn new(rules: Arc<RuleSet>, filters: Arc<ContextFilterBank>, workers: usize) -> Self {
        let workers = NonZeroUsize::new(workers)
            .or_else(|| thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            classifier: MessageClassifier::new(rules, filters),
            workers,
        }
    }

    /// Engine over the built-in catalog
    pub fn standard(settings: FilterSettings, workers: usize) -> Result<Self> {
        Ok(Self::new(
            Arc::new(crate::catalog::standard_rules()?),
            Arc::new(ContextFilterBank::new(settings)?),
            workers,
        ))
    }

    /// The underlying classifier
    #[must_use]
    pub const fn classifier(&self) -> &MessageClassifier {
        &self.classifier
    }

    /// Widest neighborhood any filter looks at
    #[must_use]
    pub fn context_radius(&self) -> usize {
        let s = self.classifier.filters().settings();
        s.repair_radius.max(s.joke_window).max(s.banter_window)
    }

    /// Classify one message in its window
    #[must_use]
    pub fn classify(&self, window: &ContextWindow<'_>) -> MessageAnalysis {
        self.classifier.classify(window)
    }

    /// Classify the messages at `targets` of a timestamp-ordered arena.
    ///
    /// Neighbors outside `targets` still serve as context, which lets callers
    /// pass padded chunks and classify only the core.
    #[must_use]
    pub fn classify_range(&self, arena: &[Message], targets: Range<usize>) -> Vec<MessageAnalysis> {
        let targets = targets.start.min(arena.len())..targets.end.min(arena.len());
        let radius = self.context_radius();
        let classify_at = |i: usize| {
            ContextWindow::around(arena, i, radius).map(|window| self.classifier.classify(&window))
        };

        let workers = self
            .workers
            .get()
            .min(targets.len().div_ceil(MIN_MESSAGES_PER_WORKER))
            .max(1);
        if workers == 1 {
            return targets.filter_map(classify_at).collect();
        }

        let per_worker = targets.len().div_ceil(workers);
        let slices: Vec<Range<usize>> = targets
            .clone()
            .step_by(per_worker)
            .map(|start| start..(start + per_worker).min(targets.end))
            .collect();
        debug!(workers = slices.len(), messages = targets.len(), "Classifying in parallel");

        thread::scope(|scope| {
            let handles: Vec<_> = slices
                .into_iter()
                .map(|slice| {
                    let classify_at = &classify_at;
                    scope.spawn(move || slice.filter_map(classify_at).collect::<Vec<_>>())
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(part) => part,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    /// Classify and aggregate a whole case.
    ///
    /// Messages are ordered by timestamp before windows are built; the input
    /// order does not matter. An empty case yields empty outputs.
    #[instrument(skip_all, fields(messages = case_messages.len()))]
    pub fn recompute(&self, case_messages: &[Message]) -> (Vec<MessageAnalysis>, Vec<DailySummary>) {
        if case_messages.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut arena = case_messages.to_vec();
        arena.sort_by_key(|m| (m.timestamp, m.id));

        let analyses = self.classify_range(&arena, 0..arena.len());
        let summaries = aggregator::aggregate(&arena, &analyses);
        (analyses, summaries)
    }
}
