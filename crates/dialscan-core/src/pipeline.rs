//! The scan pipeline: extract, then recognize, then optionally render.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::{DialscanError, Result};
use crate::extract::ExtractorSet;
use crate::models::config::DialscanConfig;
use crate::models::context::{ScanContext, ScanStatus};
use crate::models::document::Document;
use crate::models::numbers::ResultSet;
use crate::phone::{CandidateMatch, NumberRecognizer};
use crate::render::{PdfReportRenderer, ReportRenderer};

/// Runs documents through extraction and recognition.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: DialscanConfig,
    extractors: ExtractorSet,
    recognizer: NumberRecognizer,
    renderer: PdfReportRenderer,
}

impl Scanner {
    /// Create a scanner with default settings.
    pub fn new() -> Self {
        Self::from_config(&DialscanConfig::default())
    }

    pub fn from_config(config: &DialscanConfig) -> Self {
        Self {
            config: config.clone(),
            extractors: ExtractorSet::new(config.pdf.clone()),
            recognizer: NumberRecognizer::new().with_rules(config.recognizer.rules.iter().copied()),
            renderer: PdfReportRenderer::with_config(config.report.clone()),
        }
    }

    /// The configuration this scanner was built from.
    pub fn config(&self) -> &DialscanConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &NumberRecognizer {
        &self.recognizer
    }

    /// Scan a document, recording progress and the outcome in `ctx`.
    ///
    /// Extraction completes before recognition starts. On failure the context
    /// is marked failed and the error is returned unchanged.
    pub fn scan(&self, document: &Document, ctx: &mut ScanContext) -> Result<ResultSet> {
        self.scan_with(document, ctx, |_| ()).map(|(numbers, ())| numbers)
    }

    /// Scan a document and also return every raw rule match, decoding it once.
    pub fn scan_with_candidates(
        &self,
        document: &Document,
        ctx: &mut ScanContext,
    ) -> Result<(ResultSet, Vec<CandidateMatch>)> {
        self.scan_with(document, ctx, |text| self.recognizer.candidates(text))
    }

    fn scan_with<T>(
        &self,
        document: &Document,
        ctx: &mut ScanContext,
        inspect: impl FnOnce(&str) -> T,
    ) -> Result<(ResultSet, T)> {
        let start = Instant::now();
        ctx.format = Some(document.format());

        let result = self.run(document, ctx, inspect);
        ctx.processing_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((numbers, extra)) => {
                ctx.complete(numbers.clone());
                info!(
                    "{}: {} numbers in {}ms",
                    ctx.source,
                    numbers.len(),
                    ctx.processing_time_ms
                );
                Ok((numbers, extra))
            }
            Err(e) => {
                ctx.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn run<T>(
        &self,
        document: &Document,
        ctx: &mut ScanContext,
        inspect: impl FnOnce(&str) -> T,
    ) -> Result<(ResultSet, T)> {
        ctx.status = ScanStatus::Extracting;
        let text = self.extract_text(document)?;
        ctx.text_len = text.chars().count();

        ctx.status = ScanStatus::Recognizing;
        debug!("Recognizing numbers in {} chars", ctx.text_len);
        Ok((self.scan_text(&text), inspect(&text)))
    }

    /// Extract the flat text of a document without recognizing anything.
    pub fn extract_text(&self, document: &Document) -> Result<String> {
        Ok(self.extractors.extract(document)?)
    }

    /// Recognize numbers in already-extracted text.
    pub fn scan_text(&self, text: &str) -> ResultSet {
        self.recognizer.recognize(text)
    }

    /// Render the PDF report for a result set.
    pub fn render_report(&self, numbers: &ResultSet) -> Result<Vec<u8>> {
        self.renderer.render(numbers).map_err(DialscanError::from)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::extract::docx_with_paragraphs;
    use crate::models::context::ScanOutcome;
    use crate::models::document::DocumentFormat;
    use crate::phone::PatternRule;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_docx() {
        let docx = docx_with_paragraphs(&[
            "Sales: 987-654-3210",
            "Contact: 9876543210",
            "Support +91 8123456789, fax 0221234567",
        ]);
        let document = Document::new(docx, DocumentFormat::ModernWord);
        let mut ctx = ScanContext::new("contacts.docx");

        let numbers = Scanner::new().scan(&document, &mut ctx).unwrap();
        assert_eq!(numbers.as_strings(), vec!["8123456789", "9876543210"]);
        assert_eq!(ctx.status, ScanStatus::Completed);
        assert_eq!(ctx.outcome(), Some(ScanOutcome::Found(2)));
        assert_eq!(ctx.format, Some(DocumentFormat::ModernWord));
        assert!(ctx.text_len > 0);
    }

    #[test]
    fn test_scan_docx_declared_as_legacy_word() {
        let docx = docx_with_paragraphs(&["Call 7000000001"]);
        let document = Document::new(docx, DocumentFormat::LegacyWord);
        let mut ctx = ScanContext::new("renamed.doc");

        let numbers = Scanner::new().scan(&document, &mut ctx).unwrap();
        assert_eq!(numbers.as_strings(), vec!["7000000001"]);
    }

    #[test]
    fn test_report_round_trip() {
        let scanner = Scanner::new();
        let numbers = scanner.scan_text("Contact: +91-9876543210 and 07000000001");
        let report = scanner.render_report(&numbers).unwrap();

        let document = Document::new(report, DocumentFormat::Pdf);
        let mut ctx = ScanContext::new("report.pdf");
        let rescanned = scanner.scan(&document, &mut ctx).unwrap();
        assert_eq!(rescanned, numbers);
    }

    #[test]
    fn test_nothing_found_is_not_an_error() {
        let docx = docx_with_paragraphs(&["No numbers here, only 5123456789"]);
        let document = Document::new(docx, DocumentFormat::ModernWord);
        let mut ctx = ScanContext::new("empty.docx");

        let numbers = Scanner::new().scan(&document, &mut ctx).unwrap();
        assert!(numbers.is_empty());
        assert_eq!(ctx.outcome(), Some(ScanOutcome::NothingFound));
    }

    #[test]
    fn test_decode_failure_marks_context_failed() {
        let document = Document::new(b"not a pdf".to_vec(), DocumentFormat::Pdf);
        let mut ctx = ScanContext::new("broken.pdf");

        let err = Scanner::new().scan(&document, &mut ctx).unwrap_err();
        assert!(matches!(err, DialscanError::Decode(DecodeError::Pdf(_))));
        assert_eq!(ctx.status, ScanStatus::Failed);
        assert!(ctx.numbers.is_empty());
        assert!(ctx.message.is_some());
    }

    #[test]
    fn test_pdf_declared_as_word_fails() {
        let pdf = Scanner::new()
            .render_report(&Scanner::new().scan_text("9876543210"))
            .unwrap();
        let document = Document::new(pdf, DocumentFormat::ModernWord);
        let mut ctx = ScanContext::new("mislabeled.docx");

        let err = Scanner::new().scan(&document, &mut ctx).unwrap_err();
        assert!(matches!(err, DialscanError::Decode(DecodeError::Word(_))));
    }

    #[test]
    fn test_config_restricts_rules() {
        let mut config = DialscanConfig::default();
        config.recognizer.rules = vec![PatternRule::LabeledBare];
        let scanner = Scanner::from_config(&config);

        let numbers = scanner.scan_text("9876543210 Contact: 8123456789");
        assert_eq!(numbers.as_strings(), vec!["8123456789"]);
    }

    #[test]
    fn test_render_empty_report_fails() {
        let err = Scanner::new().render_report(&ResultSet::new()).unwrap_err();
        assert!(matches!(err, DialscanError::Render(_)));
    }

    #[test]
    fn test_scan_with_candidates() {
        let docx = docx_with_paragraphs(&["Contact: 987-654-3210", "fax 5123456789"]);
        let document = Document::new(docx, DocumentFormat::ModernWord);
        let mut ctx = ScanContext::new("contacts.docx");

        let (numbers, candidates) = Scanner::new()
            .scan_with_candidates(&document, &mut ctx)
            .unwrap();
        assert_eq!(numbers.as_strings(), vec!["9876543210"]);
        assert_eq!(ctx.status, ScanStatus::Completed);

        let rules: Vec<PatternRule> = candidates.iter().map(|c| c.rule).collect();
        assert_eq!(
            rules,
            vec![
                PatternRule::Bare,
                PatternRule::Grouped,
                PatternRule::Grouped,
                PatternRule::LabeledGrouped,
            ]
        );
        assert!(candidates.iter().any(|c| c.text == "5123456789"));
    }

    #[test]
    fn test_scan_with_candidates_failure() {
        let document = Document::new(b"not a pdf".to_vec(), DocumentFormat::Pdf);
        let mut ctx = ScanContext::new("broken.pdf");

        assert!(Scanner::new().scan_with_candidates(&document, &mut ctx).is_err());
        assert_eq!(ctx.status, ScanStatus::Failed);
    }

    #[test]
    fn test_scanner_keeps_its_config() {
        let mut config = DialscanConfig::default();
        config.report.file_prefix = "leads".to_string();
        config.recognizer.rules = vec![PatternRule::Bare];

        let scanner = Scanner::from_config(&config);
        assert_eq!(scanner.config().report.file_prefix, "leads");
        assert_eq!(scanner.config().recognizer.rules, scanner.recognizer().rules());
    }
}
