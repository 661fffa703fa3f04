//! PDF text extraction using lopdf, with pdf-extract as a fallback decoder.

use std::collections::BTreeMap;
use std::panic;

use lopdf::{Document, Encoding, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{Result, TextExtractor};
use crate::error::DecodeError;
use crate::models::config::PdfConfig;

/// Separator placed after every page.
const PAGE_SEPARATOR: char = ' ';

/// A `TJ` adjustment beyond this many thousandths of an em reads as a word gap.
const TJ_WORD_GAP: f32 = -100.0;

/// PDF text extractor.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Parse the buffer, decrypting with the empty password when allowed.
    ///
    /// Returns the document and, if it had to be decrypted, the decrypted
    /// bytes for the fallback decoder.
    fn load(&self, data: &[u8]) -> Result<(Document, Option<Vec<u8>>)> {
        let mut doc = Document::load_mem(data).map_err(|e| DecodeError::Pdf(e.to_string()))?;

        if !doc.is_encrypted() {
            return Ok((doc, None));
        }

        if !self.config.try_empty_password || doc.decrypt("").is_err() {
            return Err(DecodeError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| DecodeError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
        Ok((doc, Some(decrypted)))
    }

    /// Extract pages in order with lopdf.
    fn extract_pages(&self, doc: &Document) -> lopdf::Result<Vec<String>> {
        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for (page_num, page_id) in pages {
            let runs = page_runs(doc, page_id)?;
            trace!("Page {}: {} text runs", page_num, runs.len());
            texts.push(join_runs(runs.iter().map(String::as_str)));
        }

        Ok(texts)
    }

    /// Page-by-page extraction with pdf-extract.
    ///
    /// pdf-extract stops at the first page it cannot decode, so a short
    /// result is logged and an empty one is an error.
    fn extract_pages_fallback(&self, data: &[u8], page_count: usize) -> Result<Vec<String>> {
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data))
            .map_err(|_| DecodeError::Pdf("pdf-extract panicked while decoding".to_string()))?
            .map_err(|e| DecodeError::Pdf(e.to_string()))?;

        if pages.is_empty() {
            return Err(DecodeError::Pdf("pdf-extract decoded no pages".to_string()));
        }
        if pages.len() < page_count {
            warn!("pdf-extract decoded {} of {} pages", pages.len(), page_count);
        }

        Ok(pages.iter().map(|page| join_runs(page.lines())).collect())
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let (doc, decrypted) = self.load(data)?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            debug!("PDF has no pages");
            return Ok(String::new());
        }
        debug!("Loaded PDF with {} pages", page_count);

        let pages = match self.extract_pages(&doc) {
            Ok(pages) => pages,
            Err(e) if self.config.fallback_extractor => {
                warn!("lopdf could not decode page text ({}), falling back to pdf-extract", e);
                self.extract_pages_fallback(decrypted.as_deref().unwrap_or(data), page_count)?
            }
            Err(e) => return Err(DecodeError::Pdf(e.to_string())),
        };

        Ok(concat_pages(&pages))
    }
}

/// Decode one page into text runs, one per text-showing operator.
fn page_runs(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let mut encodings = BTreeMap::new();
    for (name, font) in doc.get_page_fonts(page_id)? {
        encodings.insert(name, font.get_font_encoding(doc)?);
    }
    let content = doc.get_and_decode_page_content(page_id)?;

    let mut runs = Vec::new();
    let mut encoding = None;
    for op in &content.operations {
        match op.operator.as_str() {
            "Tf" => {
                let font = op
                    .operands
                    .first()
                    .ok_or_else(|| lopdf::Error::Syntax("Tf without a font name".to_string()))?
                    .as_name()?;
                encoding = encodings.get(font);
            }
            "Tj" | "TJ" | "'" | "\"" => {
                let encoding = encoding.ok_or_else(|| {
                    lopdf::Error::Syntax(format!("{} with no font selected", op.operator))
                })?;
                runs.push(decode_run(encoding, &op.operands)?);
            }
            _ => {}
        }
    }

    Ok(runs)
}

/// Decode the string operands of a single text-showing operator.
fn decode_run(encoding: &Encoding, operands: &[Object]) -> lopdf::Result<String> {
    let mut run = String::new();
    for operand in operands {
        match operand {
            Object::String(bytes, _) => run.push_str(&Document::decode_text(encoding, bytes)?),
            Object::Array(items) => {
                for item in items {
                    match item {
                        Object::String(bytes, _) => {
                            run.push_str(&Document::decode_text(encoding, bytes)?)
                        }
                        Object::Integer(gap) if (*gap as f32) < TJ_WORD_GAP => run.push(' '),
                        Object::Real(gap) if *gap < TJ_WORD_GAP => run.push(' '),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    Ok(run)
}

/// Join the text runs of one page with single spaces.
fn join_runs<'a>(runs: impl IntoIterator<Item = &'a str>) -> String {
    runs.into_iter()
        .map(str::trim)
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Concatenate pages, each followed by the page separator.
fn concat_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push(PAGE_SEPARATOR);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::extract_numbers;
    use crate::render::pdf::{FontKind, TextLine, build_document, save_document, write_document};
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;
    use lopdf::encryption::{decrypt_object, get_encryption_key};
    use pretty_assertions::assert_eq;

    fn line(y: i64, text: &str) -> TextLine {
        TextLine::new(FontKind::Regular, 12, 50, y, text)
    }

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    /// A single page holding one text block with the given operators.
    fn text_block(ops: Vec<Operation>) -> Vec<u8> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
        ];
        operations.extend(ops);
        operations.push(Operation::new("ET", vec![]));

        let doc = build_document(595, 842, &[Content { operations }]).unwrap();
        save_document(doc).unwrap()
    }

    fn show(text: &str) -> Operation {
        Operation::new("Tj", vec![Object::string_literal(text)])
    }

    fn advance(x: i64) -> Operation {
        Operation::new("Td", vec![x.into(), 0.into()])
    }

    fn two_page_document() -> Document {
        let pages = [
            vec![line(700, "Contact: +91-9876543210"), line(675, "Sales team")],
            vec![line(700, "Fax 080-123-4567")],
        ];
        let contents: Vec<Content> = pages
            .iter()
            .map(|lines| Content {
                operations: lines.iter().flat_map(TextLine::operations).collect(),
            })
            .collect();
        build_document(595, 842, &contents).unwrap()
    }

    /// Drop `/Type /Font` from every font so lopdf refuses to pick an encoding.
    fn strip_font_types(doc: &mut Document) {
        for object in doc.objects.values_mut() {
            if let Object::Dictionary(dict) = object {
                if dict.has_type(b"Font") {
                    dict.remove(b"Type");
                }
            }
        }
    }

    /// RC4-encrypt every stream under the standard security handler.
    ///
    /// Without a `/U` entry lopdf derives the key without checking the
    /// password, so the empty password opens the result.
    fn encrypt(mut doc: Document, user_check: Option<Vec<u8>>) -> Vec<u8> {
        let mut handler = dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "Length" => 40,
            "P" => -4,
            "O" => Object::string_literal(vec![0x5A; 32]),
            "CF" => dictionary! {
                "StdCF" => dictionary! { "CFM" => "V2" },
            },
        };
        if let Some(check) = user_check {
            handler.set("U", Object::string_literal(check));
        }
        let handler_id = doc.add_object(handler);
        doc.trailer.set("Encrypt", handler_id);
        doc.trailer.set(
            "ID",
            vec![
                Object::string_literal("dialscan-test-id"),
                Object::string_literal("dialscan-test-id"),
            ],
        );

        let key = get_encryption_key(&doc, "", false).unwrap();
        for (&id, object) in doc.objects.iter_mut() {
            // RC4 is symmetric, so decrypting plain content encrypts it
            let Ok(sealed) = decrypt_object(&key, id, &*object, false) else {
                continue;
            };
            if let Object::Stream(stream) = object {
                stream.set_content(sealed);
            }
        }

        save_document(doc).unwrap()
    }

    fn without_fallback() -> PdfExtractor {
        PdfExtractor::with_config(PdfConfig {
            fallback_extractor: false,
            ..PdfConfig::default()
        })
    }

    #[test]
    fn test_join_runs() {
        assert_eq!(
            join_runs(["  Contact:", "", "9876543210  ", " "]),
            "Contact: 9876543210"
        );
        assert_eq!(join_runs("".lines()), "");
    }

    #[test]
    fn test_concat_pages() {
        let pages = vec!["one".to_string(), "two".to_string()];
        assert_eq!(concat_pages(&pages), "one two ");
    }

    #[test]
    fn test_extract_pages_in_order() {
        let pdf = write_document(
            595,
            842,
            &[
                vec![line(700, "Contact: +91-9876543210"), line(675, "Sales team")],
                vec![line(700, "Fax 080-123-4567")],
            ],
        )
        .unwrap();

        let text = PdfExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Contact: +91-9876543210 Sales team Fax 080-123-4567 ");
    }

    #[test]
    fn test_runs_in_one_block_stay_apart() {
        let pdf = text_block(vec![show("Call"), advance(60), show("9876543210")]);

        let text = PdfExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Call 9876543210 ");
        assert_eq!(extract_numbers(&text), vec!["9876543210"]);
    }

    #[test]
    fn test_split_digits_do_not_fuse() {
        let pdf = text_block(vec![show("98765"), advance(60), show("43210")]);

        let text = PdfExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "98765 43210 ");
        assert!(extract_numbers(&text).is_empty());
    }

    #[test]
    fn test_tj_arrays_and_quote_operators() {
        let pdf = text_block(vec![
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("987"),
                    (-20).into(),
                    Object::string_literal("6543210"),
                    (-250).into(),
                    Object::string_literal("Sales"),
                ])],
            ),
            Operation::new("TL", vec![14.into()]),
            Operation::new("'", vec![Object::string_literal("Fax")]),
            Operation::new(
                "\"",
                vec![0.into(), 0.into(), Object::string_literal("080-123-4567")],
            ),
        ]);

        let text = PdfExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "9876543210 Sales Fax 080-123-4567 ");
    }

    #[test]
    fn test_text_without_font_is_an_error() {
        let operations = vec![
            Operation::new("BT", vec![]),
            show("9876543210"),
            Operation::new("ET", vec![]),
        ];
        let doc = build_document(595, 842, &[Content { operations }]).unwrap();
        let pdf = save_document(doc).unwrap();

        let err = without_fallback().extract(&pdf).unwrap_err();
        assert!(matches!(err, DecodeError::Pdf(_)));
    }

    #[test]
    fn test_zero_page_pdf_is_empty_text() {
        let pdf = save_document(build_document(595, 842, &[]).unwrap()).unwrap();
        assert_eq!(PdfExtractor::new().extract(&pdf).unwrap(), "");
    }

    #[test]
    fn test_fallback_decodes_pages_lopdf_rejects() {
        let mut doc = two_page_document();
        strip_font_types(&mut doc);
        let pdf = save_document(doc).unwrap();

        let err = without_fallback().extract(&pdf).unwrap_err();
        assert!(matches!(err, DecodeError::Pdf(_)));

        let text = PdfExtractor::new().extract(&pdf).unwrap();
        assert_eq!(
            words(&text),
            vec!["Contact:", "+91-9876543210", "Sales", "team", "Fax", "080-123-4567"]
        );
        assert!(text.ends_with(PAGE_SEPARATOR));
    }

    #[test]
    fn test_fallback_keeps_pages_apart() {
        let mut doc = two_page_document();
        strip_font_types(&mut doc);
        let pdf = save_document(doc).unwrap();

        let pages = PdfExtractor::new().extract_pages_fallback(&pdf, 2).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(words(&pages[0]), vec!["Contact:", "+91-9876543210", "Sales", "team"]);
        assert_eq!(words(&pages[1]), vec!["Fax", "080-123-4567"]);
    }

    #[test]
    fn test_empty_password_decrypts() {
        let pdf = encrypt(two_page_document(), None);
        assert!(Document::load_mem(&pdf).unwrap().is_encrypted());

        let text = PdfExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Contact: +91-9876543210 Sales team Fax 080-123-4567 ");
    }

    #[test]
    fn test_fallback_receives_decrypted_bytes() {
        let mut doc = two_page_document();
        strip_font_types(&mut doc);
        let pdf = encrypt(doc, None);

        let extractor = PdfExtractor::new();
        let (_, decrypted) = extractor.load(&pdf).unwrap();
        let decrypted = decrypted.unwrap();
        assert!(!Document::load_mem(&decrypted).unwrap().is_encrypted());

        let pages = extractor.extract_pages_fallback(&decrypted, 2).unwrap();
        assert_eq!(words(&pages[1]), vec!["Fax", "080-123-4567"]);

        let text = extractor.extract(&pdf).unwrap();
        assert_eq!(
            words(&text),
            vec!["Contact:", "+91-9876543210", "Sales", "team", "Fax", "080-123-4567"]
        );
    }

    #[test]
    fn test_wrong_user_password_is_encrypted_error() {
        let pdf = encrypt(two_page_document(), Some(vec![0; 32]));
        let err = PdfExtractor::new().extract(&pdf).unwrap_err();
        assert_eq!(err, DecodeError::Encrypted);
    }

    #[test]
    fn test_empty_password_attempt_can_be_disabled() {
        let pdf = encrypt(two_page_document(), None);
        let extractor = PdfExtractor::with_config(PdfConfig {
            try_empty_password: false,
            ..PdfConfig::default()
        });

        assert_eq!(extractor.extract(&pdf).unwrap_err(), DecodeError::Encrypted);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = PdfExtractor::new().extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, DecodeError::Pdf(_)));
    }
}
