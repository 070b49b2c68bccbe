//! Positive-to-negative balance over a case's analyses, and the 0-100
//! health score built on top of it

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Direction, Message, MessageAnalysis};
use crate::rules::RuleSet;

/// Ratio at or above which communication is considered healthy
pub const HEALTHY_RATIO: f64 = 5.0;
/// Ratio at or above which communication is at risk rather than unhealthy
pub const AT_RISK_RATIO: f64 = 3.0;
/// Ratio below which communication is critical
pub const UNHEALTHY_RATIO: f64 = 1.0;
/// Negative categories weighted at or above this count as high severity
pub const HIGH_SEVERITY_WEIGHT: u8 = 8;

const MAX_RATIO_POINTS: u32 = 40;
const MAX_FACTOR_POINTS: u32 = 20;
const MAX_SCORE: u32 = 100;

/// Overall health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthClass {
    /// No patterns of either polarity
    Neutral,
    /// Predominantly positive
    Healthy,
    /// Mixed signals
    AtRisk,
    /// Significant negative patterns
    Unhealthy,
    /// More negative than positive
    Critical,
}

impl HealthClass {
    /// Classify a positive/negative count pair
    #[must_use]
    pub fn from_counts(positive: usize, negative: usize) -> Self {
        if positive == 0 && negative == 0 {
            return Self::Neutral;
        }
        if negative == 0 {
            return Self::Healthy;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = positive as f64 / negative as f64;
        if ratio >= HEALTHY_RATIO {
            Self::Healthy
        } else if ratio >= AT_RISK_RATIO {
            Self::AtRisk
        } else if ratio >= UNHEALTHY_RATIO {
            Self::Unhealthy
        } else {
            Self::Critical
        }
    }

    /// Label used in reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Healthy => "healthy",
            Self::AtRisk => "at_risk",
            Self::Unhealthy => "unhealthy",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health report for a set of analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Positive over negative; `None` when there are no negative patterns
    pub ratio: Option<f64>,
    /// Overall classification
    pub classification: HealthClass,
    /// Supportive pattern hits
    pub positive_count: usize,
    /// Surviving negative pattern hits
    pub negative_count: usize,
    /// Analyses considered
    pub total_messages: usize,
    /// Supportive hits per category
    pub positive_breakdown: BTreeMap<String, usize>,
    /// Negative hits per category
    pub negative_breakdown: BTreeMap<String, usize>,
    /// Overall score, 0-100
    pub score: u32,
    /// Letter grade for `score`
    pub grade: Grade,
    /// Points contributed by each factor
    pub factors: HealthFactors,
    /// Suggestions for the weakest factors
    pub recommendations: Vec<String>,
}

/// Letter grade for a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::A,
            65..=79 => Self::B,
            50..=64 => Self::C,
            35..=49 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// The four components of the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthFactors {
    /// Positive-to-negative ratio, 0-40
    pub ratio_score: u32,
    /// Distinct supportive categories, 0-20
    pub diversity_score: u32,
    /// Absence of high-severity negatives, 0-20
    pub severity_score: u32,
    /// Supportive hits shared between both parties, 0-20
    pub balance_score: u32,
}

impl HealthFactors {
    /// 40 at a ratio of 5 or more (or positives with no negatives), scaling
    /// down piecewise through 3 and 1 to 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn ratio_points(positive: usize, negative: usize) -> u32 {
        if negative == 0 {
            return if positive > 0 { MAX_RATIO_POINTS } else { 0 };
        }
        let ratio = positive as f64 / negative as f64;
        let points = if ratio >= HEALTHY_RATIO {
            f64::from(MAX_RATIO_POINTS)
        } else if ratio >= AT_RISK_RATIO {
            20.0 + (ratio - AT_RISK_RATIO) * 10.0
        } else if ratio >= UNHEALTHY_RATIO {
            10.0 + (ratio - UNHEALTHY_RATIO) * 5.0
        } else {
            ratio * 10.0
        };
        points as u32
    }

    /// Three points per distinct supportive category, capped at 20
    #[must_use]
    pub fn diversity_points(categories: usize) -> u32 {
        u32::try_from(categories.saturating_mul(3)).map_or(MAX_FACTOR_POINTS, |p| p.min(MAX_FACTOR_POINTS))
    }

    /// 20 with no high-severity categories, 10 with one or two, else 0
    #[must_use]
    pub const fn severity_points(high_severity_categories: usize) -> u32 {
        match high_severity_categories {
            0 => MAX_FACTOR_POINTS,
            1 | 2 => MAX_FACTOR_POINTS / 2,
            _ => 0,
        }
    }

    /// Share of supportive hits from the less supportive party, scaled so an
    /// even split earns 20
    #[must_use]
    pub fn balance_points(sent: usize, received: usize) -> u32 {
        let total = sent + received;
        if total == 0 {
            return 0;
        }
        let points = sent.min(received) * 40 / total;
        u32::try_from(points).map_or(MAX_FACTOR_POINTS, |p| p.min(MAX_FACTOR_POINTS))
    }

    /// Sum of all factors, clamped to 0-100
    #[must_use]
    pub fn total(&self) -> u32 {
        (self.ratio_score + self.diversity_score + self.severity_score + self.balance_score).min(MAX_SCORE)
    }

    fn recommendations(&self, high_severity: &BTreeSet<String>) -> Vec<String> {
        let mut out = Vec::new();
        if self.ratio_score < MAX_RATIO_POINTS / 2 {
            out.push(
                "Raise the share of positive exchanges; stable relationships show \
                 roughly five positive interactions for each negative one."
                    .to_string(),
            );
        }
        if self.diversity_score < MAX_FACTOR_POINTS / 2 {
            out.push(
                "Broaden supportive behavior: validation, encouragement, appreciation \
                 and attentive listening all build connection."
                    .to_string(),
            );
        }
        if self.severity_score < MAX_FACTOR_POINTS {
            let names: Vec<&str> = high_severity.iter().map(String::as_str).collect();
            out.push(format!(
                "High-severity patterns present ({}); outside professional support may help.",
                names.join(", ")
            ));
        }
        if self.balance_score < MAX_FACTOR_POINTS / 2 {
            out.push(
                "Supportive messages come mostly from one side; both parties should \
                 be contributing positively."
                    .to_string(),
            );
        }
        if out.is_empty() {
            out.push("Patterns look healthy; keep up the positive, mutual support.".to_string());
        }
        out
    }
}

/// Count pattern hits, classify the balance and score the case.
///
/// `messages` supplies the direction of each analyzed message for the
/// balance factor; category weights come from `rules`.
#[must_use]
pub fn assess(rules: &RuleSet, messages: &[Message], analyses: &[MessageAnalysis]) -> HealthReport {
    let directions: HashMap<i64, Direction> = messages.iter().map(|m| (m.id, m.direction)).collect();
    let mut positive_breakdown = BTreeMap::new();
    let mut negative_breakdown = BTreeMap::new();
    let (mut sent_positive, mut received_positive) = (0, 0);

    for analysis in analyses {
        for label in &analysis.patterns {
            *negative_breakdown.entry(label.clone()).or_insert(0) += 1;
        }
        for label in &analysis.supportive {
            *positive_breakdown.entry(label.clone()).or_insert(0) += 1;
        }
        match directions.get(&analysis.message_id) {
            Some(Direction::Sent) => sent_positive += analysis.supportive.len(),
            Some(Direction::Received) => received_positive += analysis.supportive.len(),
            None => {}
        }
    }

    let high_severity: BTreeSet<String> = negative_breakdown
        .keys()
        .filter(|name| {
            rules
                .category(name)
                .is_some_and(|c| c.is_negative() && c.weight() >= HIGH_SEVERITY_WEIGHT)
        })
        .cloned()
        .collect();

    let positive_count: usize = positive_breakdown.values().sum();
    let negative_count: usize = negative_breakdown.values().sum();
    #[allow(clippy::cast_precision_loss)]
    let ratio = (negative_count > 0).then(|| positive_count as f64 / negative_count as f64);

    let factors = HealthFactors {
        ratio_score: HealthFactors::ratio_points(positive_count, negative_count),
        diversity_score: HealthFactors::diversity_points(positive_breakdown.len()),
        severity_score: HealthFactors::severity_points(high_severity.len()),
        balance_score: HealthFactors::balance_points(sent_positive, received_positive),
    };
    let score = factors.total();

    HealthReport {
        ratio,
        classification: HealthClass::from_counts(positive_count, negative_count),
        positive_count,
        negative_count,
        total_messages: analyses.len(),
        positive_breakdown,
        negative_breakdown,
        score,
        grade: Grade::from_score(score),
        recommendations: factors.recommendations(&high_severity),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(HealthClass::from_counts(0, 0), HealthClass::Neutral);
        assert_eq!(HealthClass::from_counts(3, 0), HealthClass::Healthy);
        assert_eq!(HealthClass::from_counts(10, 2), HealthClass::Healthy);
        assert_eq!(HealthClass::from_counts(6, 2), HealthClass::AtRisk);
        assert_eq!(HealthClass::from_counts(2, 2), HealthClass::Unhealthy);
        assert_eq!(HealthClass::from_counts(1, 2), HealthClass::Critical);
    }

    fn rules() -> RuleSet {
        crate::catalog::standard_rules().expect("Failed to compile catalog")
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn case(rows: &[(Direction, &[&str], &[&str])]) -> (Vec<Message>, Vec<MessageAnalysis>) {
        rows.iter()
            .zip(1..)
            .map(|((direction, negative, positive), id)| {
                let mut analysis = MessageAnalysis::empty(id);
                analysis.patterns = labels(negative);
                analysis.supportive = labels(positive);
                (Message::text(id, *direction, "x"), analysis)
            })
            .unzip()
    }

    #[test]
    fn test_assess_breakdown() {
        let (messages, analyses) = case(&[
            (Direction::Received, &["deny", "contempt"], &[]),
            (Direction::Sent, &["deny"], &["empathy"]),
        ]);

        let report = assess(&rules(), &messages, &analyses);
        assert_eq!(report.negative_count, 3);
        assert_eq!(report.negative_breakdown["deny"], 2);
        assert_eq!(report.positive_count, 1);
        assert_eq!(report.classification, HealthClass::Critical);
        assert_eq!(report.total_messages, 2);
    }

    #[test]
    fn test_ratio_points() {
        assert_eq!(HealthFactors::ratio_points(0, 0), 0);
        assert_eq!(HealthFactors::ratio_points(3, 0), 40);
        assert_eq!(HealthFactors::ratio_points(10, 2), 40);
        assert_eq!(HealthFactors::ratio_points(9, 2), 35);
        assert_eq!(HealthFactors::ratio_points(6, 2), 20);
        assert_eq!(HealthFactors::ratio_points(5, 2), 17);
        assert_eq!(HealthFactors::ratio_points(2, 2), 10);
        assert_eq!(HealthFactors::ratio_points(1, 2), 5);
        assert_eq!(HealthFactors::ratio_points(0, 2), 0);
    }

    #[test]
    fn test_diversity_points() {
        assert_eq!(HealthFactors::diversity_points(0), 0);
        assert_eq!(HealthFactors::diversity_points(3), 9);
        assert_eq!(HealthFactors::diversity_points(4), 12);
        assert_eq!(HealthFactors::diversity_points(6), 18);
        assert_eq!(HealthFactors::diversity_points(7), 20);
        assert_eq!(HealthFactors::diversity_points(14), 20);
    }

    #[test]
    fn test_severity_points() {
        assert_eq!(HealthFactors::severity_points(0), 20);
        assert_eq!(HealthFactors::severity_points(1), 10);
        assert_eq!(HealthFactors::severity_points(2), 10);
        assert_eq!(HealthFactors::severity_points(3), 0);
    }

    #[test]
    fn test_balance_points() {
        assert_eq!(HealthFactors::balance_points(0, 0), 0);
        assert_eq!(HealthFactors::balance_points(5, 0), 0);
        assert_eq!(HealthFactors::balance_points(1, 3), 10);
        assert_eq!(HealthFactors::balance_points(1, 2), 13);
        assert_eq!(HealthFactors::balance_points(4, 4), 20);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(80), Grade::A);
        assert_eq!(Grade::from_score(79), Grade::B);
        assert_eq!(Grade::from_score(65), Grade::B);
        assert_eq!(Grade::from_score(64), Grade::C);
        assert_eq!(Grade::from_score(50), Grade::C);
        assert_eq!(Grade::from_score(49), Grade::D);
        assert_eq!(Grade::from_score(35), Grade::D);
        assert_eq!(Grade::from_score(34), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
        assert_eq!(Grade::B.to_string(), "B");
    }

    #[test]
    fn test_high_severity_uses_category_weight() {
        // gaslighting and control weigh 8 or more, deny does not
        let (messages, analyses) = case(&[
            (Direction::Received, &["gaslighting", "deny"], &[]),
            (Direction::Received, &["control"], &[]),
        ]);
        let report = assess(&rules(), &messages, &analyses);
        assert_eq!(report.factors.severity_score, 10);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("control, gaslighting")));
    }

    #[test]
    fn test_supportive_case_scores_high() {
        let (messages, analyses) = case(&[
            (Direction::Sent, &[], &["empathy", "validation", "appreciation", "gratitude"]),
            (Direction::Received, &[], &["encouragement", "reassurance", "affirmation", "compromise"]),
        ]);
        let report = assess(&rules(), &messages, &analyses);

        assert_eq!(
            report.factors,
            HealthFactors {
                ratio_score: 40,
                diversity_score: 20,
                severity_score: 20,
                balance_score: 20,
            }
        );
        assert_eq!(report.score, 100);
        assert_eq!(report.grade, Grade::A);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_empty_case_scores_severity_only() {
        let report = assess(&rules(), &[], &[]);
        assert_eq!(report.classification, HealthClass::Neutral);
        assert_eq!(report.score, 20);
        assert_eq!(report.grade, Grade::F);
        // ratio, diversity and balance all fall short
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_one_sided_support_is_flagged() {
        let (messages, analyses) = case(&[
            (Direction::Sent, &[], &["empathy"]),
            (Direction::Sent, &[], &["validation"]),
            (Direction::Received, &["dismissive"], &[]),
        ]);
        let report = assess(&rules(), &messages, &analyses);
        assert_eq!(report.factors.balance_score, 0);
        assert_eq!(report.factors.ratio_score, 15);
        assert_eq!(report.score, 15 + 6 + 20);
        assert_eq!(report.grade, Grade::D);
    }
}
