//! Candidate normalization.

use crate::models::numbers::CanonicalNumber;

/// Reduce a raw candidate to a canonical number.
///
/// See [`CanonicalNumber::parse`] for the rules.
pub fn normalize(candidate: &str) -> Option<CanonicalNumber> {
    CanonicalNumber::parse(candidate)
}
