//! Pattern rules: definitions, compilation and matching
//!
//! A [`RuleSet`] is compiled once from a list of [`CategoryDefinition`]s and
//! is immutable afterwards, so it can be shared across worker threads without
//! locking. Every category is plain data; behavioural differences between
//! categories (severity, suppression exemption, addressee requirement) are
//! flags on the category, never special-cased code.

use std::collections::HashSet;
use std::ops::Range;

use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::{Polarity, Severity};
use crate::text;

/// Categories that must always carry the never-suppressed flag.
pub const PROTECTED_CATEGORIES: [&str; 5] = [
    "control",
    "financial_control",
    "weaponize_family",
    "gaslighting",
    "emotional_blackmail",
];

const ADDRESSEE_PATTERN: &str = r"\b(you|your|you're|youre|yours|yourself|ya|u|ur)\b";

const REGEX_SIZE_LIMIT: usize = 256 * (1 << 20);

/// Uncompiled description of one pattern category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Stable machine name, used as the pattern label
    pub name: String,
    /// Human readable label
    pub label: String,
    /// One-line description for reports
    pub description: String,
    /// Literature reference, if any
    #[serde(default)]
    pub citation: Option<String>,
    /// Negative or supportive
    pub polarity: Polarity,
    /// Fixed tier; required for negative categories
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Exempt from all context suppression
    #[serde(default)]
    pub never_suppressed: bool,
    /// Match only counts when the same sentence addresses the other party
    #[serde(default)]
    pub requires_addressee: bool,
    /// Relative weight 1-10 (concern for negatives, value for supportive)
    pub weight: u8,
    /// Case-insensitive regular expressions
    pub patterns: Vec<String>,
}

impl CategoryDefinition {
    /// A negative category; severe categories are flagged never-suppressed.
    #[must_use]
    pub fn negative(name: &str, severity: Severity, weight: u8, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            description: String::new(),
            citation: None,
            polarity: Polarity::Negative,
            severity: Some(severity),
            never_suppressed: severity == Severity::Severe,
            requires_addressee: false,
            weight,
            patterns: patterns.iter().map(ToString::to_string).collect(),
        }
    }

    /// A supportive category
    #[must_use]
    pub fn supportive(name: &str, weight: u8, patterns: &[&str]) -> Self {
        Self {
            polarity: Polarity::Supportive,
            severity: None,
            never_suppressed: false,
            ..Self::negative(name, Severity::Mild, weight, patterns)
        }
    }

    /// Set display label and description
    #[must_use]
    pub fn about(mut self, label: &str, description: &str) -> Self {
        self.label = label.to_string();
        self.description = description.to_string();
        self
    }

    /// Set the literature reference
    #[must_use]
    pub fn cite(mut self, citation: &str) -> Self {
        self.citation = Some(citation.to_string());
        self
    }

    /// Require a second-person reference in the matched sentence
    #[must_use]
    pub fn addressed(mut self) -> Self {
        self.requires_addressee = true;
        self
    }
}

/// A compiled, immutable pattern category
#[derive(Debug, Clone)]
pub struct PatternCategory {
    name: String,
    label: String,
    description: String,
    citation: Option<String>,
    polarity: Polarity,
    severity: Option<Severity>,
    never_suppressed: bool,
    requires_addressee: bool,
    weight: u8,
    matchers: Vec<Regex>,
}

impl PatternCategory {
    /// Machine name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Report description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Literature reference
    #[must_use]
    pub fn citation(&self) -> Option<&str> {
        self.citation.as_deref()
    }

    /// Negative or supportive
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Tier for negative categories, `None` for supportive ones
    #[must_use]
    pub const fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// Whether context filters may discard matches of this category
    #[must_use]
    pub const fn never_suppressed(&self) -> bool {
        self.never_suppressed
    }

    /// Whether a second-person reference is needed in the matched sentence
    #[must_use]
    pub const fn requires_addressee(&self) -> bool {
        self.requires_addressee
    }

    /// Relative weight 1-10
    #[must_use]
    pub const fn weight(&self) -> u8 {
        self.weight
    }

    /// True for negative categories
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.polarity == Polarity::Negative
    }
}

/// One rule hit inside a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'r> {
    /// Category that matched
    pub category: &'r PatternCategory,
    /// Byte span in the normalized body
    pub span: Range<usize>,
    /// Matched text
    pub text: String,
}

impl PartialEq for PatternCategory {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PatternCategory {}

/// The compiled rule collection
#[derive(Debug, Clone)]
pub struct RuleSet {
    categories: Vec<PatternCategory>,
    prefilter: RegexSet,
    owners: Vec<(usize, usize)>,
    addressee: Regex,
}

fn build_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

fn check_definition(def: &CategoryDefinition) -> Result<()> {
    let name = def.name.as_str();
    if name.trim().is_empty() {
        return Err(AnalysisError::rule(name, "category name is empty"));
    }
    if def.patterns.is_empty() {
        return Err(AnalysisError::rule(name, "category has no matchers"));
    }
    if !(1..=10).contains(&def.weight) {
        return Err(AnalysisError::rule(name, "weight must be between 1 and 10"));
    }

    match def.polarity {
        Polarity::Negative => {
            let Some(severity) = def.severity else {
                return Err(AnalysisError::rule(name, "negative category has no severity tier"));
            };
            if def.never_suppressed != (severity == Severity::Severe) {
                return Err(AnalysisError::rule(
                    name,
                    "never_suppressed must be set exactly on severe categories",
                ));
            }
            if PROTECTED_CATEGORIES.contains(&name) && !def.never_suppressed {
                return Err(AnalysisError::rule(name, "protected category must be never_suppressed"));
            }
        }
        Polarity::Supportive => {
            if def.severity.is_some() || def.never_suppressed || def.requires_addressee {
                return Err(AnalysisError::rule(
                    name,
                    "supportive category cannot carry severity or suppression flags",
                ));
            }
            if PROTECTED_CATEGORIES.contains(&name) {
                return Err(AnalysisError::rule(name, "protected category must be negative"));
            }
        }
    }
    Ok(())
}

impl RuleSet {
    /// Compile definitions into a rule set.
    ///
    /// Any malformed matcher or inconsistent flag aborts the whole compile;
    /// there is no partially usable rule set.
    pub fn compile(definitions: &[CategoryDefinition]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(definitions.len());
        let mut owners = Vec::new();
        let mut sources = Vec::new();

        for def in definitions {
            check_definition(def)?;
            if !seen.insert(def.name.as_str()) {
                return Err(AnalysisError::rule(&def.name, "duplicate category name"));
            }

            let mut matchers = Vec::with_capacity(def.patterns.len());
            for (mi, pattern) in def.patterns.iter().enumerate() {
                let regex = build_regex(pattern).map_err(|e| {
                    AnalysisError::rule(&def.name, format!("matcher {mi} '{pattern}': {e}"))
                })?;
                matchers.push(regex);
                owners.push((categories.len(), mi));
                sources.push(pattern.as_str());
            }

            categories.push(PatternCategory {
                name: def.name.clone(),
                label: def.label.clone(),
                description: def.description.clone(),
                citation: def.citation.clone(),
                polarity: def.polarity,
                severity: def.severity,
                never_suppressed: def.never_suppressed,
                requires_addressee: def.requires_addressee,
                weight: def.weight,
                matchers,
            });
        }

        let prefilter = RegexSetBuilder::new(&sources)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| AnalysisError::rule("<prefilter>", e.to_string()))?;
        let addressee = build_regex(ADDRESSEE_PATTERN)
            .map_err(|e| AnalysisError::rule("<addressee>", e.to_string()))?;

        debug!(
            categories = categories.len(),
            matchers = owners.len(),
            "Compiled rule set"
        );

        Ok(Self {
            categories,
            prefilter,
            owners,
            addressee,
        })
    }

    /// All categories in definition order
    #[must_use]
    pub fn categories(&self) -> &[PatternCategory] {
        &self.categories
    }

    /// Look up a category by machine name
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&PatternCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Number of categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True if no categories were compiled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Run every rule against `body`.
    ///
    /// Matches are returned in category definition order, then matcher order.
    /// Each matcher contributes at most one match. Categories are evaluated
    /// independently; a hit in one never hides a hit in another.
    #[must_use]
    pub fn match_all(&self, body: &str) -> Vec<RuleMatch<'_>> {
        let normalized = text::normalize(body);
        let haystack = normalized.as_ref();

        let mut matches = Vec::new();
        for idx in self.prefilter.matches(haystack).iter() {
            let (ci, mi) = self.owners[idx];
            let category = &self.categories[ci];
            let regex = &category.matchers[mi];

            let found = if category.requires_addressee {
                regex
                    .find_iter(haystack)
                    .find(|m| self.is_addressed(haystack, m.start()))
            } else {
                regex.find(haystack)
            };

            if let Some(m) = found {
                matches.push(RuleMatch {
                    category,
                    span: m.range(),
                    text: m.as_str().to_string(),
                });
            }
        }
        matches
    }

    fn is_addressed(&self, haystack: &str, offset: usize) -> bool {
        let sentence = text::sentence_around(haystack, offset);
        self.addressee.is_match(&haystack[sentence])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negative(name: &str, severity: Severity, patterns: &[&str]) -> CategoryDefinition {
        CategoryDefinition::negative(name, severity, 5, patterns)
    }

    #[test]
    fn test_compile_rejects_bad_regex() {
        let defs = vec![negative("broken", Severity::Mild, &[r"(unclosed"])];
        let err = RuleSet::compile(&defs).expect_err("bad regex must fail");
        assert!(matches!(err, AnalysisError::RuleCompilation { ref category, .. } if category == "broken"));
    }

    #[test]
    fn test_compile_rejects_duplicate_names() {
        let defs = vec![
            negative("dup", Severity::Mild, &["a"]),
            negative("dup", Severity::Mild, &["b"]),
        ];
        assert!(RuleSet::compile(&defs).is_err());
    }

    #[test]
    fn test_compile_rejects_unflagged_protected_category() {
        let mut def = negative("gaslighting", Severity::Moderate, &["crazy"]);
        def.never_suppressed = false;
        assert!(RuleSet::compile(&[def]).is_err());
    }

    #[test]
    fn test_compile_rejects_flag_on_mild_category() {
        let mut def = negative("soft", Severity::Mild, &["meh"]);
        def.never_suppressed = true;
        assert!(RuleSet::compile(&[def]).is_err());
    }

    #[test]
    fn test_match_all_is_case_insensitive_and_ordered() {
        let defs = vec![
            negative("first", Severity::Mild, &[r"\bwhatever\b"]),
            negative("second", Severity::Moderate, &[r"\bnever\b", r"\bhappened\b"]),
        ];
        let rules = RuleSet::compile(&defs).expect("Failed to compile rules");
        let hits = rules.match_all("WHATEVER, that never HAPPENED");
        let names: Vec<_> = hits.iter().map(|m| m.category.name()).collect();
        assert_eq!(names, ["first", "second", "second"]);
        assert_eq!(hits[2].text, "HAPPENED");
    }

    #[test]
    fn test_addressee_requirement() {
        let def = negative("profanity", Severity::Mild, &[r"\bf[u*][c*][k*]\w*"]).addressed();
        let rules = RuleSet::compile(&[def]).expect("Failed to compile rules");

        assert!(rules.match_all("that movie was f***ing great").is_empty());
        assert_eq!(rules.match_all("f*** you").len(), 1);
        // the addressee has to be in the same sentence
        assert!(rules.match_all("you saw it. fucking great movie").is_empty());
    }
}
