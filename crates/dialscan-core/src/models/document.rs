//! Input documents and their declared formats.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DialscanError, ValidationError};

/// MIME type for PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for legacy Word documents (.doc).
pub const MIME_LEGACY_WORD: &str = "application/msword";
/// MIME type for modern Word documents (.docx).
pub const MIME_MODERN_WORD: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Declared format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Word 97-2003 (.doc).
    LegacyWord,
    /// Office Open XML Word (.docx).
    ModernWord,
}

impl DocumentFormat {
    /// All supported formats.
    pub const ALL: [DocumentFormat; 3] = [Self::Pdf, Self::LegacyWord, Self::ModernWord];

    /// Resolve a format from its MIME type.
    pub fn from_mime(mime: &str) -> Result<Self, ValidationError> {
        match mime.trim() {
            "" => Err(ValidationError::MissingFormat),
            MIME_PDF => Ok(Self::Pdf),
            MIME_LEGACY_WORD => Ok(Self::LegacyWord),
            MIME_MODERN_WORD => Ok(Self::ModernWord),
            other => Err(ValidationError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolve a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or(ValidationError::MissingFormat)?;

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "doc" => Ok(Self::LegacyWord),
            "docx" => Ok(Self::ModernWord),
            _ => Err(ValidationError::UnsupportedFormat(format!(".{}", extension))),
        }
    }

    /// Canonical MIME type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => MIME_PDF,
            Self::LegacyWord => MIME_LEGACY_WORD,
            Self::ModernWord => MIME_MODERN_WORD,
        }
    }

    /// Whether the format is one of the Word variants.
    pub fn is_word(&self) -> bool {
        matches!(self, Self::LegacyWord | Self::ModernWord)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pdf => "PDF",
            Self::LegacyWord => "Word (.doc)",
            Self::ModernWord => "Word (.docx)",
        };
        f.write_str(label)
    }
}

/// A raw document buffer with its declared format.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    format: DocumentFormat,
}

impl Document {
    /// Wrap a buffer whose format is already known.
    pub fn new(bytes: impl Into<Vec<u8>>, format: DocumentFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    /// Wrap a buffer, validating its declared MIME type.
    pub fn from_mime(bytes: impl Into<Vec<u8>>, mime: &str) -> Result<Self, ValidationError> {
        let format = DocumentFormat::from_mime(mime)?;
        Ok(Self::new(bytes, format))
    }

    /// Read a document from disk, deriving the format from the extension.
    pub fn open(path: &Path) -> Result<Self, DialscanError> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(bytes, format))
    }

    /// Raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared format.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
