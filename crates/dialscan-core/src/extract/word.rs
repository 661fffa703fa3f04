//! Word text extraction from the Office Open XML container.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, trace};
use zip::ZipArchive;
use zip::result::ZipError;

use super::{Result, TextExtractor};
use crate::error::DecodeError;

/// Main document part inside a .docx container.
const DOCUMENT_PART: &str = "word/document.xml";

/// Signature of an OLE2 compound file (binary .doc).
const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Raw-text extractor for Word documents.
#[derive(Debug, Clone, Default)]
pub struct WordExtractor;

impl WordExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read_document_xml(&self, data: &[u8]) -> Result<String> {
        let mut archive =
            ZipArchive::new(Cursor::new(data)).map_err(|e| DecodeError::Word(e.to_string()))?;

        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            ZipError::FileNotFound => DecodeError::Word(format!("missing {}", DOCUMENT_PART)),
            other => DecodeError::Word(other.to_string()),
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| DecodeError::Word(e.to_string()))?;
        Ok(xml)
    }
}

impl TextExtractor for WordExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        if data.starts_with(&OLE2_MAGIC) {
            return Err(DecodeError::UnsupportedSubFormat(
                "legacy binary Word (.doc)".to_string(),
            ));
        }

        let xml = self.read_document_xml(data)?;
        debug!("Read {} bytes of {}", xml.len(), DOCUMENT_PART);
        document_xml_to_text(&xml)
    }
}

/// Flatten WordprocessingML into raw text.
///
/// Text runs are concatenated, tabs and breaks become whitespace and every
/// paragraph ends with a blank line. Everything else is dropped.
fn document_xml_to_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_run = false;
    let mut paragraphs = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => {
                in_text_run = true;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => {
                in_text_run = false;
            }
            Ok(Event::Text(ref e)) if in_text_run => {
                let run = e
                    .unescape()
                    .map_err(|err| DecodeError::Word(err.to_string()))?;
                text.push_str(&run);
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:p" => {
                paragraphs += 1;
                text.push_str("\n\n");
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DecodeError::Word(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
        buf.clear();
    }

    trace!("Flattened {} paragraphs", paragraphs);
    Ok(text)
}
