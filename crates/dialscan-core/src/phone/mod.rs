//! Rule-based phone number recognition.
//!
//! Each [`PatternRule`] is scanned over the flat text on its own. Every match
//! of every rule becomes a [`CandidateMatch`]; candidates are then normalized,
//! filtered and collapsed into a sorted [`ResultSet`](crate::models::ResultSet).

mod normalize;
pub mod patterns;
mod recognizer;

pub use normalize::normalize;
pub use recognizer::{NumberRecognizer, extract_numbers};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single recognition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternRule {
    /// Bare 10-digit run.
    Bare,
    /// 3-3-4 groups with optional `-`, `.` or whitespace separators.
    Grouped,
    /// `+91` followed by 10 digits.
    PlusCountryCode,
    /// `91` followed by 10 digits.
    CountryCode,
    /// `0` followed by 10 digits.
    TrunkPrefix,
    /// `Contact:` label followed by a bare number.
    LabeledBare,
    /// `Contact:` label followed by a grouped number.
    LabeledGrouped,
}

impl PatternRule {
    /// All rules in scan order.
    pub const ALL: [PatternRule; 7] = [
        Self::Bare,
        Self::Grouped,
        Self::PlusCountryCode,
        Self::CountryCode,
        Self::TrunkPrefix,
        Self::LabeledBare,
        Self::LabeledGrouped,
    ];

    /// Compiled pattern for this rule.
    pub fn regex(&self) -> &'static Regex {
        match self {
            Self::Bare => &patterns::BARE,
            Self::Grouped => &patterns::GROUPED,
            Self::PlusCountryCode => &patterns::PLUS_COUNTRY_CODE,
            Self::CountryCode => &patterns::COUNTRY_CODE,
            Self::TrunkPrefix => &patterns::TRUNK_PREFIX,
            Self::LabeledBare => &patterns::LABELED_BARE,
            Self::LabeledGrouped => &patterns::LABELED_GROUPED,
        }
    }
}

/// Raw substring matched by one rule, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateMatch {
    /// Rule that produced the match.
    pub rule: PatternRule,
    /// Matched text.
    pub text: String,
    /// Byte span in the source text.
    pub position: (usize, usize),
}

impl CandidateMatch {
    pub fn new(rule: PatternRule, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            rule,
            text: text.into(),
            position: (start, end),
        }
    }
}
