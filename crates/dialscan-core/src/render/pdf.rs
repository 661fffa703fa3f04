//! Paginated PDF report written with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::debug;

use super::{ReportRenderer, Result};
use crate::error::RenderError;
use crate::models::config::ReportConfig;
use crate::models::numbers::ResultSet;

/// Standard font used for a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontKind {
    Regular,
    Bold,
}

impl FontKind {
    fn resource_name(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// A single positioned line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextLine {
    pub font: FontKind,
    pub size: i64,
    pub x: i64,
    pub y: i64,
    pub text: String,
}

impl TextLine {
    pub fn new(font: FontKind, size: i64, x: i64, y: i64, text: impl Into<String>) -> Self {
        Self {
            font,
            size,
            x,
            y,
            text: text.into(),
        }
    }

    pub(crate) fn operations(&self) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![self.font.resource_name().into(), self.size.into()]),
            Operation::new("Td", vec![self.x.into(), self.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(self.text.as_str())]),
            Operation::new("ET", vec![]),
        ]
    }
}

/// Lays out one number per line on A4 pages.
#[derive(Debug, Clone, Default)]
pub struct PdfReportRenderer {
    config: ReportConfig,
}

impl PdfReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Position the heading and every number, starting a new page whenever
    /// the next line would fall below the bottom margin.
    pub(crate) fn layout(&self, numbers: &ResultSet) -> Vec<Vec<TextLine>> {
        let c = &self.config;
        let mut pages = Vec::new();
        let mut page = vec![TextLine::new(
            FontKind::Bold,
            c.heading_font_size,
            c.margin_left,
            c.page_height - c.heading_offset,
            format!("Total Numbers Found: {}", numbers.len()),
        )];
        let mut y = c.page_height - c.first_line_offset;

        for number in numbers {
            if y < c.bottom_margin {
                pages.push(std::mem::take(&mut page));
                y = c.page_height - c.continuation_offset;
            }
            page.push(TextLine::new(
                FontKind::Regular,
                c.font_size,
                c.margin_left,
                y,
                number.as_str(),
            ));
            y -= c.line_height;
        }

        pages.push(page);
        pages
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, numbers: &ResultSet) -> Result<Vec<u8>> {
        if numbers.is_empty() {
            return Err(RenderError::Empty);
        }

        let pages = self.layout(numbers);
        debug!("Rendering {} numbers on {} pages", numbers.len(), pages.len());
        write_document(self.config.page_width, self.config.page_height, &pages)
    }
}

/// Serialize positioned lines into a PDF, one content stream per page.
pub(crate) fn write_document(width: i64, height: i64, pages: &[Vec<TextLine>]) -> Result<Vec<u8>> {
    let contents: Vec<Content> = pages
        .iter()
        .map(|lines| Content {
            operations: lines.iter().flat_map(TextLine::operations).collect(),
        })
        .collect();
    save_document(build_document(width, height, &contents)?)
}

/// Assemble a document with both standard fonts and one page per content stream.
pub(crate) fn build_document(width: i64, height: i64, pages: &[Content]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontKind::Regular.resource_name() => regular_id,
            FontKind::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for content in pages {
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

pub(crate) fn save_document(mut doc: Document) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::numbers::CanonicalNumber;
    use pretty_assertions::assert_eq;

    fn numbers(count: usize) -> ResultSet {
        (0..count)
            .filter_map(|i| CanonicalNumber::parse(&format!("9{:09}", i)))
            .collect()
    }

    #[test]
    fn test_layout_first_page() {
        let pages = PdfReportRenderer::new().layout(&numbers(2));
        assert_eq!(pages.len(), 1);

        let heading = &pages[0][0];
        assert_eq!(heading.font, FontKind::Bold);
        assert_eq!(heading.text, "Total Numbers Found: 2");
        assert_eq!((heading.x, heading.y, heading.size), (50, 732, 14));

        assert_eq!(pages[0][1].y, 692);
        assert_eq!(pages[0][2].y, 667);
        assert_eq!(pages[0][2].text, "9000000001");
    }

    #[test]
    fn test_layout_paginates_at_bottom_margin() {
        let renderer = PdfReportRenderer::new();

        // page one fits lines at y = 692 down to 67
        let pages = renderer.layout(&numbers(26));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].last().unwrap().y, 67);

        let pages = renderer.layout(&numbers(27));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1][0].y, 792);

        // continuation pages fit 30 lines (792 down to 67)
        assert_eq!(renderer.layout(&numbers(56)).len(), 2);
        assert_eq!(renderer.layout(&numbers(57)).len(), 3);
    }

    #[test]
    fn test_render_empty_is_refused() {
        let err = PdfReportRenderer::new().render(&ResultSet::new()).unwrap_err();
        assert_eq!(err, RenderError::Empty);
    }

    #[test]
    fn test_render_produces_parseable_pdf() {
        let bytes = PdfReportRenderer::new().render(&numbers(40)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);

        let first = doc.extract_text(&[1]).unwrap();
        assert!(first.contains("Total Numbers Found: 40"));
        assert!(first.contains("9000000000"));

        let second = doc.extract_text(&[2]).unwrap();
        assert!(second.contains("9000000039"));
        assert!(!second.contains("Total Numbers Found"));
    }

    #[test]
    fn test_custom_geometry() {
        let config = ReportConfig {
            page_height: 300,
            first_line_offset: 100,
            continuation_offset: 20,
            line_height: 100,
            ..ReportConfig::default()
        };
        // lines at 200, 100, then 0 < 50 starts a new page at 280
        let pages = PdfReportRenderer::with_config(config).layout(&numbers(3));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1][0].y, 280);
    }
}
