//! Number recognizer: scan, normalize, filter, dedupe, sort.

use tracing::{debug, trace};

use super::{CandidateMatch, PatternRule, normalize};
use crate::models::numbers::ResultSet;

/// Applies a set of independent pattern rules to flat text.
#[derive(Debug, Clone)]
pub struct NumberRecognizer {
    rules: Vec<PatternRule>,
}

impl NumberRecognizer {
    /// Create a recognizer using every rule.
    pub fn new() -> Self {
        Self {
            rules: PatternRule::ALL.to_vec(),
        }
    }

    /// Restrict the recognizer to the given rules.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = PatternRule>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Every non-overlapping match of every rule, grouped by rule.
    pub fn candidates(&self, text: &str) -> Vec<CandidateMatch> {
        let mut results = Vec::new();

        for rule in &self.rules {
            for m in rule.regex().find_iter(text) {
                trace!("{:?} matched {:?} at {}..{}", rule, m.as_str(), m.start(), m.end());
                results.push(CandidateMatch::new(*rule, m.as_str(), m.start(), m.end()));
            }
        }

        results
    }

    /// Recognize canonical numbers in `text`.
    pub fn recognize(&self, text: &str) -> ResultSet {
        let candidates = self.candidates(text);
        let total = candidates.len();

        let numbers: ResultSet = candidates
            .into_iter()
            .filter_map(|c| normalize(&c.text))
            .collect();

        debug!(
            "Recognized {} numbers from {} candidates in {} chars",
            numbers.len(),
            total,
            text.len()
        );
        numbers
    }
}

impl Default for NumberRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognize numbers in text with every rule enabled.
pub fn extract_numbers(text: &str) -> Vec<String> {
    NumberRecognizer::new().recognize(text).as_strings()
}
