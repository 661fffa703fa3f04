//! Document text extraction.
//!
//! Each extractor turns a raw buffer into flat text or fails with a
//! [`DecodeError`]. No partial text is ever returned.

mod pdf;
mod word;

pub use pdf::PdfExtractor;
pub use word::WordExtractor;

#[cfg(test)]
pub(crate) use word::tests::docx_with_paragraphs;

use tracing::debug;

use crate::error::DecodeError;
use crate::models::config::PdfConfig;
use crate::models::document::{Document, DocumentFormat};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Trait for format-specific text extractors.
pub trait TextExtractor {
    /// Decode `data` into a single flat string.
    fn extract(&self, data: &[u8]) -> Result<String>;
}

/// Extractors for every supported format.
#[derive(Debug, Clone, Default)]
pub struct ExtractorSet {
    pdf: PdfExtractor,
    word: WordExtractor,
}

impl ExtractorSet {
    pub fn new(pdf_config: PdfConfig) -> Self {
        Self {
            pdf: PdfExtractor::with_config(pdf_config),
            word: WordExtractor::new(),
        }
    }

    /// Pick the extractor for a declared format.
    pub fn for_format(&self, format: DocumentFormat) -> &dyn TextExtractor {
        match format {
            DocumentFormat::Pdf => &self.pdf,
            DocumentFormat::LegacyWord | DocumentFormat::ModernWord => &self.word,
        }
    }

    /// Extract flat text from a document.
    pub fn extract(&self, document: &Document) -> Result<String> {
        debug!(
            "Extracting text from {} ({} bytes)",
            document.format(),
            document.len()
        );
        let text = self.for_format(document.format()).extract(document.bytes())?;
        debug!("Extracted {} chars", text.len());
        Ok(text)
    }
}

/// Extract flat text from a document with default settings.
pub fn extract_text(document: &Document) -> Result<String> {
    ExtractorSet::default().extract(document)
}
