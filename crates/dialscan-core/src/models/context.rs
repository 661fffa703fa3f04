//! Per-request scan state.

use serde::Serialize;

use super::document::DocumentFormat;
use super::numbers::ResultSet;

/// Message reported when a scan finds nothing.
pub const NOTHING_FOUND_MESSAGE: &str = "No contact numbers found in the file";

/// Lifecycle of a single scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Pending,
    Extracting,
    Recognizing,
    Completed,
    Failed,
}

/// How a completed scan should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// At least one number was found.
    Found(usize),
    /// Recognition succeeded with an empty result.
    NothingFound,
}

/// State carried through the pipeline for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ScanContext {
    /// Display name of the source (usually the file name).
    pub source: String,
    /// Declared format, once validated.
    pub format: Option<DocumentFormat>,
    /// Current pipeline stage.
    pub status: ScanStatus,
    /// Length of the extracted flat text in characters.
    pub text_len: usize,
    /// Numbers found, set on completion.
    pub numbers: ResultSet,
    /// User-facing outcome or error message.
    pub message: Option<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ScanContext {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            format: None,
            status: ScanStatus::Pending,
            text_len: 0,
            numbers: ResultSet::new(),
            message: None,
            processing_time_ms: 0,
        }
    }

    /// Whether the scan is still running.
    pub fn is_loading(&self) -> bool {
        matches!(self.status, ScanStatus::Extracting | ScanStatus::Recognizing)
    }

    pub(crate) fn complete(&mut self, numbers: ResultSet) {
        self.status = ScanStatus::Completed;
        self.numbers = numbers;
        self.message = Some(match self.outcome() {
            Some(ScanOutcome::Found(count)) => format!("Found {} contact numbers!", count),
            _ => NOTHING_FOUND_MESSAGE.to_string(),
        });
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.status = ScanStatus::Failed;
        self.numbers = ResultSet::new();
        self.message = Some(message.into());
    }

    /// Outcome of a completed scan; `None` while pending or after a failure.
    pub fn outcome(&self) -> Option<ScanOutcome> {
        match self.status {
            ScanStatus::Completed if self.numbers.is_empty() => Some(ScanOutcome::NothingFound),
            ScanStatus::Completed => Some(ScanOutcome::Found(self.numbers.len())),
            _ => None,
        }
    }
}
