//! Data models shared across the pipeline.

pub mod config;
pub mod context;
pub mod document;
pub mod numbers;

pub use config::{DialscanConfig, OutputConfig, PdfConfig, RecognizerConfig, ReportConfig};
pub use context::{ScanContext, ScanOutcome, ScanStatus, NOTHING_FOUND_MESSAGE};
pub use document::{Document, DocumentFormat, MIME_LEGACY_WORD, MIME_MODERN_WORD, MIME_PDF};
pub use numbers::{CanonicalNumber, Preview, ResultSet, CANONICAL_LEN};
