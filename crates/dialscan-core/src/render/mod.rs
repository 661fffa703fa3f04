//! Report rendering for recognized numbers.

pub(crate) mod pdf;

pub use pdf::PdfReportRenderer;

use chrono::{DateTime, Utc};

use crate::error::RenderError;
use crate::models::numbers::ResultSet;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Trait for report renderers.
pub trait ReportRenderer {
    /// Render the numbers into a new document.
    fn render(&self, numbers: &ResultSet) -> Result<Vec<u8>>;
}

/// File name for a report generated at `at`.
pub fn report_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.pdf", prefix, at.timestamp_millis())
}
