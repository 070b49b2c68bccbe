//! Per-message classification and severity resolution
//!
//! Classification is a pure function of the message and its context window:
//! running it twice on the same input yields the same analysis, and the
//! message's direction is never consulted.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::{ContextFilterBank, ContextSignal, ContextWindow};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{MessageAnalysis, Severity};
use crate::rules::{PatternCategory, RuleMatch, RuleSet};
use crate::text;

/// Derives one severity from the surviving negative matches
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityResolver;

impl SeverityResolver {
    /// Highest tier among the matches; `None` when nothing negative survived.
    #[must_use]
    pub fn resolve(surviving: &[RuleMatch<'_>]) -> Option<Severity> {
        surviving
            .iter()
            .filter_map(|m| m.category.severity())
            .max()
    }
}

/// The single suppression decision: exempt categories always survive,
/// everything else is dropped when any context signal fired.
#[must_use]
pub const fn should_suppress(category: &PatternCategory, signal: Option<ContextSignal>) -> bool {
    !category.never_suppressed() && signal.is_some()
}

/// Full result of classifying one message, including what was dropped
#[derive(Debug, Clone)]
pub struct Classification<'r> {
    /// The persisted analysis
    pub analysis: MessageAnalysis,
    /// Negative matches that survived suppression
    pub surviving: Vec<RuleMatch<'r>>,
    /// Negative matches discarded, with the signal that discarded them
    pub suppressed: Vec<(RuleMatch<'r>, ContextSignal)>,
}

/// Applies the rule set and context filters to messages
#[derive(Debug, Clone)]
pub struct MessageClassifier {
    rules: Arc<RuleSet>,
    filters: Arc<ContextFilterBank>,
    metrics: MetricsCollector,
}

fn push_unique(target: &mut Vec<String>, value: &str) {
    if !target.iter().any(|v| v == value) {
        target.push(value.to_string());
    }
}

impl MessageClassifier {
    /// Create a classifier over shared rules and filters
    #[must_use]
    pub fn new(rules: Arc<RuleSet>, filters: Arc<ContextFilterBank>) -> Self {
        Self {
            rules,
            filters,
            metrics: MetricsCollector::default(),
        }
    }

    /// Classifier with the built-in catalog and default filter windows
    pub fn standard() -> Result<Self> {
        Ok(Self::new(
            Arc::new(crate::catalog::standard_rules()?),
            Arc::new(ContextFilterBank::standard()?),
        ))
    }

    /// The compiled rules
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The context filters
    #[must_use]
    pub fn filters(&self) -> &ContextFilterBank {
        &self.filters
    }

    /// Classify the window's candidate message.
    ///
    /// Malformed messages are logged and come back as an empty, non-hurtful
    /// analysis; they never fail the caller.
    #[must_use]
    pub fn classify(&self, window: &ContextWindow<'_>) -> MessageAnalysis {
        match self.classify_detailed(window) {
            Ok(classification) => classification.analysis,
            Err(e) => {
                let message_id = window.candidate().id;
                warn!(message_id, error = %e, "Skipping malformed message");
                self.metrics.record_malformed();
                MessageAnalysis::empty(message_id)
            }
        }
    }

    /// Classify and keep the individual matches.
    ///
    /// Returns `MalformedMessage` for bodies that cannot be analyzed.
    pub fn classify_detailed<'s>(&'s self, window: &ContextWindow<'_>) -> Result<Classification<'s>> {
        let message = window.candidate();
        let Some(body) = text::classifiable_body(message)? else {
            let analysis = MessageAnalysis::empty(message.id);
            self.metrics.record_classification(&analysis);
            return Ok(Classification {
                analysis,
                surviving: Vec::new(),
                suppressed: Vec::new(),
            });
        };

        let (negatives, positives): (Vec<_>, Vec<_>) = self
            .rules
            .match_all(body)
            .into_iter()
            .partition(|m| m.category.is_negative());

        // filters only run when something could actually be dropped
        let signal = if negatives.iter().any(|m| !m.category.never_suppressed()) {
            self.filters.first_signal(window)
        } else {
            None
        };

        let mut surviving = Vec::with_capacity(negatives.len());
        let mut suppressed = Vec::new();
        for m in negatives {
            match signal {
                Some(s) if should_suppress(m.category, signal) => {
                    debug!(
                        message_id = message.id,
                        category = m.category.name(),
                        signal = s.as_str(),
                        "Suppressed match"
                    );
                    self.metrics.record_suppression(m.category.name(), s.as_str());
                    suppressed.push((m, s));
                }
                _ => surviving.push(m),
            }
        }

        let mut analysis = MessageAnalysis::empty(message.id);
        for m in &surviving {
            push_unique(&mut analysis.patterns, m.category.name());
            push_unique(&mut analysis.keywords, &m.text);
        }
        for m in &positives {
            push_unique(&mut analysis.supportive, m.category.name());
        }
        analysis.severity = SeverityResolver::resolve(&surviving);
        analysis.is_hurtful = analysis.severity.is_some();
        analysis.is_apology = self.filters.is_apology_text(body);

        self.metrics.record_classification(&analysis);
        Ok(Classification {
            analysis,
            surviving,
            suppressed,
        })
    }

    /// Classify every message of an ordered arena with windows of `radius`.
    #[must_use]
    pub fn classify_all(&self, arena: &[crate::models::Message], radius: usize) -> Vec<MessageAnalysis> {
        (0..arena.len())
            .filter_map(|i| ContextWindow::around(arena, i, radius))
            .map(|window| self.classify(&window))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Message};

    fn classifier() -> MessageClassifier {
        MessageClassifier::standard().expect("Failed to build classifier")
    }

    #[test]
    fn test_resolver_picks_highest_tier() {
        let classifier = classifier();
        let matches = classifier.rules().match_all("whatever, you're crazy");
        assert_eq!(SeverityResolver::resolve(&matches), Some(Severity::Severe));
        assert_eq!(SeverityResolver::resolve(&[]), None);
    }

    #[test]
    fn test_empty_body_is_not_hurtful() {
        let classifier = classifier();
        let mut message = Message::text(9, Direction::Sent, "");
        message.media_type = crate::models::MediaType::Image;
        message.body = None;
        let analysis = classifier.classify(&ContextWindow::solitary(&message));
        assert_eq!(analysis, MessageAnalysis::empty(9));
    }

    #[test]
    fn test_malformed_body_recovers() {
        let classifier = classifier();
        let message = Message::text(4, Direction::Received, "you're crazy \u{FFFD}");
        let window = ContextWindow::solitary(&message);
        assert!(classifier.classify_detailed(&window).is_err());
        assert!(!classifier.classify(&window).is_hurtful);
    }

    #[test]
    fn test_suppressed_matches_are_reported() {
        let classifier = classifier();
        let arena = vec![
            Message::text(1, Direction::Received, "whatever"),
            Message::text(2, Direction::Sent, "I'm sorry, I was wrong"),
        ];
        let window = ContextWindow::around(&arena, 0, 4).expect("center in range");
        let result = classifier
            .classify_detailed(&window)
            .expect("Failed to classify");
        assert!(result.surviving.is_empty());
        assert_eq!(result.suppressed.len(), 1);
        assert_eq!(result.suppressed[0].1, ContextSignal::Apology);
    }

    #[test]
    fn test_keywords_are_literal_matches() {
        let classifier = classifier();
        let message = Message::text(1, Direction::Sent, "You're crazy");
        let analysis = classifier.classify(&ContextWindow::solitary(&message));
        assert_eq!(analysis.keywords, ["You're crazy"]);
        assert_eq!(analysis.patterns, ["gaslighting"]);
    }
}
