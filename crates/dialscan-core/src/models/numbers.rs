//! Canonical phone numbers and the sorted result set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of a canonical number.
pub const CANONICAL_LEN: usize = 10;

/// A normalized 10-digit mobile number whose first digit is 6, 7, 8 or 9.
///
/// Every value comes out of [`CanonicalNumber::parse`]; deserialization goes
/// through it as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
    /// Reduce a raw candidate to a canonical number.
    ///
    /// Non-digits are dropped, then a `91` country code (12 digits) or a `0`
    /// trunk prefix (11 digits) is stripped. Anything that is not 10 digits
    /// starting with 6-9 afterwards is rejected.
    pub fn parse(candidate: &str) -> Option<Self> {
        let digits: String = candidate.chars().filter(char::is_ascii_digit).collect();

        let trimmed = if digits.len() == 12 && digits.starts_with("91") {
            &digits[2..]
        } else if digits.len() == 11 && digits.starts_with('0') {
            &digits[1..]
        } else {
            &digits[..]
        };

        is_canonical(trimmed).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grouped 3-3-4 form for display (e.g. `987-654-3210`).
    pub fn grouped(&self) -> String {
        format!("{}-{}-{}", &self.0[0..3], &self.0[3..6], &self.0[6..10])
    }
}

fn is_canonical(digits: &str) -> bool {
    digits.len() == CANONICAL_LEN
        && digits.bytes().all(|b| b.is_ascii_digit())
        && matches!(digits.as_bytes()[0], b'6'..=b'9')
}

impl fmt::Display for CanonicalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CanonicalNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a mobile number: {}", value))
    }
}

impl From<CanonicalNumber> for String {
    fn from(number: CanonicalNumber) -> Self {
        number.0
    }
}

/// Deduplicated canonical numbers in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    numbers: Vec<CanonicalNumber>,
}

/// Leading slice of a result set plus how many entries were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview<'a> {
    pub shown: &'a [CanonicalNumber],
    pub remaining: usize,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalNumber> {
        self.numbers.iter()
    }

    pub fn as_slice(&self) -> &[CanonicalNumber] {
        &self.numbers
    }

    pub fn contains(&self, number: &str) -> bool {
        self.numbers
            .binary_search_by(|n| n.as_str().cmp(number))
            .is_ok()
    }

    /// Plain strings, in order.
    pub fn as_strings(&self) -> Vec<String> {
        self.numbers.iter().map(|n| n.to_string()).collect()
    }

    /// First `limit` numbers and the count that did not fit.
    pub fn preview(&self, limit: usize) -> Preview<'_> {
        let shown = &self.numbers[..limit.min(self.numbers.len())];
        Preview {
            shown,
            remaining: self.numbers.len() - shown.len(),
        }
    }
}

impl FromIterator<CanonicalNumber> for ResultSet {
    fn from_iter<I: IntoIterator<Item = CanonicalNumber>>(iter: I) -> Self {
        let unique: BTreeSet<CanonicalNumber> = iter.into_iter().collect();
        Self {
            numbers: unique.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = CanonicalNumber;
    type IntoIter = std::vec::IntoIter<CanonicalNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.numbers.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a CanonicalNumber;
    type IntoIter = std::slice::Iter<'a, CanonicalNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.numbers.iter()
    }
}
