//! Error types for the dialscan-core library.

use thiserror::Error;

/// Main error type for the dialscan library.
#[derive(Error, Debug)]
pub enum DialscanError {
    /// Input was rejected before extraction.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The document could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Report rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating the declared document format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No format was supplied.
    #[error("no document format supplied")]
    MissingFormat,

    /// The supplied format is not PDF or Word.
    #[error("unsupported document format: {0} (expected PDF or Word: .pdf, .doc, .docx)")]
    UnsupportedFormat(String),
}

/// Errors raised by the text extraction decoders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Failed to parse the PDF or decode its content streams.
    #[error("failed to decode PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be opened with an empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Failed to read the Word container or its XML.
    #[error("failed to decode Word document: {0}")]
    Word(String),

    /// The container is recognised but its variant cannot be decoded.
    #[error("unsupported document sub-format: {0}")]
    UnsupportedSubFormat(String),
}

/// Errors related to report rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// There is nothing to put in the report.
    #[error("no contact numbers to render")]
    Empty,

    /// The PDF writer failed.
    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

/// Result type for the dialscan library.
pub type Result<T> = std::result::Result<T, DialscanError>;
