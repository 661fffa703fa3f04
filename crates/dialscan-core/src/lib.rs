//! Core library for dialscan.
//!
//! This crate provides:
//! - Text extraction from PDF and Word (.docx) documents
//! - Rule-based recognition of Indian mobile numbers
//! - A paginated PDF report listing the numbers found
//! - The scan pipeline tying these together with a per-request context

pub mod error;
pub mod extract;
pub mod models;
pub mod phone;
pub mod pipeline;
pub mod render;

pub use error::{DecodeError, DialscanError, RenderError, Result, ValidationError};
pub use extract::{ExtractorSet, PdfExtractor, TextExtractor, WordExtractor, extract_text};
pub use models::config::DialscanConfig;
pub use models::{CanonicalNumber, Document, DocumentFormat, ResultSet, ScanContext, ScanOutcome, ScanStatus};
pub use phone::{CandidateMatch, NumberRecognizer, PatternRule, extract_numbers};
pub use pipeline::Scanner;
pub use render::{PdfReportRenderer, ReportRenderer, report_file_name};
