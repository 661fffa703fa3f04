//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};

use crate::error::DialscanError;
use crate::phone::PatternRule;

/// Main configuration for dialscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DialscanConfig {
    /// PDF decoding configuration.
    pub pdf: PdfConfig,

    /// Number recognition configuration.
    pub recognizer: RecognizerConfig,

    /// PDF report layout.
    pub report: ReportConfig,

    /// Console output configuration.
    pub output: OutputConfig,
}

/// PDF decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Try to open encrypted PDFs with the empty user password.
    pub try_empty_password: bool,

    /// Fall back to pdf-extract when lopdf cannot decode a page.
    pub fallback_extractor: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            try_empty_password: true,
            fallback_extractor: true,
        }
    }
}

/// Number recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Pattern rules to apply, in order.
    pub rules: Vec<PatternRule>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            rules: PatternRule::ALL.to_vec(),
        }
    }
}

/// Layout of the generated PDF report, in PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Page width (A4 by default).
    pub page_width: i64,

    /// Page height (A4 by default).
    pub page_height: i64,

    /// Left margin for all text.
    pub margin_left: i64,

    /// Distance from the top of page one to the heading baseline.
    pub heading_offset: i64,

    /// Distance from the top of page one to the first number.
    pub first_line_offset: i64,

    /// Distance from the top of continuation pages to their first number.
    pub continuation_offset: i64,

    /// Vertical step between numbers.
    pub line_height: i64,

    /// A new page starts once the next line would fall below this.
    pub bottom_margin: i64,

    /// Heading font size.
    pub heading_font_size: i64,

    /// Number font size.
    pub font_size: i64,

    /// File name prefix for generated reports.
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: 595,
            page_height: 842,
            margin_left: 50,
            heading_offset: 110,
            first_line_offset: 150,
            continuation_offset: 50,
            line_height: 25,
            bottom_margin: 50,
            heading_font_size: 14,
            font_size: 12,
            file_prefix: "extracted-contacts".to_string(),
        }
    }
}

/// Console output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Numbers listed before the "... and N more" line.
    pub preview_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { preview_limit: 10 }
    }
}

impl DialscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Reject report geometry that cannot paginate.
    pub fn validate(&self) -> Result<(), DialscanError> {
        let r = &self.report;
        if r.line_height <= 0 {
            return Err(DialscanError::Config(format!(
                "report.line_height must be positive, got {}",
                r.line_height
            )));
        }
        if r.bottom_margin >= r.page_height - r.first_line_offset.max(r.continuation_offset) {
            return Err(DialscanError::Config(
                "report.bottom_margin leaves no room for numbers".to_string(),
            ));
        }
        if r.file_prefix.trim().is_empty() {
            return Err(DialscanError::Config("report.file_prefix is empty".to_string()));
        }
        Ok(())
    }
}
