//! Regex patterns for Indian mobile numbers.

use lazy_static::lazy_static;
use regex::Regex;

// Word boundaries are ASCII-only, so letters from other scripts next to the
// digits still count as a boundary.
lazy_static! {
    // 10 digits on their own
    pub static ref BARE: Regex = Regex::new(
        r"(?-u:\b)[0-9]{10}(?-u:\b)"
    ).unwrap();

    // XXX-XXX-XXXX, XXX.XXX.XXXX, XXX XXX XXXX
    pub static ref GROUPED: Regex = Regex::new(
        r"(?-u:\b)[0-9]{3}[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}(?-u:\b)"
    ).unwrap();

    // +91 country code
    pub static ref PLUS_COUNTRY_CODE: Regex = Regex::new(
        r"\+91[-.\s]?[0-9]{10}(?-u:\b)"
    ).unwrap();

    // 91 country code without the plus
    pub static ref COUNTRY_CODE: Regex = Regex::new(
        r"(?-u:\b)91[-.\s]?[0-9]{10}(?-u:\b)"
    ).unwrap();

    // 0 trunk prefix
    pub static ref TRUNK_PREFIX: Regex = Regex::new(
        r"(?-u:\b)0[0-9]{10}(?-u:\b)"
    ).unwrap();

    // Contact: 9876543210
    pub static ref LABELED_BARE: Regex = Regex::new(
        r"(?i)(?-u:\b)Contact:\s*[0-9]{10}(?-u:\b)"
    ).unwrap();

    // Contact: 987-654-3210
    pub static ref LABELED_GROUPED: Regex = Regex::new(
        r"(?i)(?-u:\b)Contact:\s*[0-9]{3}[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}(?-u:\b)"
    ).unwrap();
}
