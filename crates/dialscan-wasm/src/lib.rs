//! WASM bindings for dialscan.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use std::path::Path;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use dialscan_core::models::config::DialscanConfig;
use dialscan_core::phone::normalize;
use dialscan_core::{Document, DocumentFormat, ResultSet, ScanContext, Scanner};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Whether a MIME type names a supported document format.
#[wasm_bindgen]
pub fn is_supported_mime(mime: &str) -> bool {
    DocumentFormat::from_mime(mime).is_ok()
}

/// Recognize contact numbers in plain text.
#[wasm_bindgen]
pub fn extract_numbers_from_text(text: &str) -> Vec<String> {
    dialscan_core::extract_numbers(text)
}

/// Extract contact numbers from a PDF or Word document.
#[wasm_bindgen]
pub fn extract_numbers(data: &[u8], mime: &str) -> Result<Vec<String>, JsValue> {
    ContactScanner::new().extract(data, mime)
}

/// Render the PDF report for a list of numbers.
///
/// Inputs are normalized first; anything that is not a mobile number is dropped.
#[wasm_bindgen]
pub fn render_report(numbers: Vec<String>) -> Result<Vec<u8>, JsValue> {
    ContactScanner::new().render(numbers)
}

/// Suggested download name for a report generated now.
#[wasm_bindgen]
pub fn report_file_name() -> String {
    report_file_name_now(&DialscanConfig::default().report.file_prefix)
}

fn report_file_name_now(prefix: &str) -> String {
    let millis = js_sys::Date::now() as i64;
    let at = chrono::DateTime::from_timestamp_millis(millis).unwrap_or_default();
    dialscan_core::report_file_name(prefix, at)
}

/// Scan a browser `File`, resolving to the scan summary.
#[wasm_bindgen]
pub async fn scan_file(file: web_sys::File) -> Result<JsValue, JsValue> {
    scan_browser_file(Scanner::new(), file).await
}

/// The declared MIME type wins; an empty type falls back to the file extension.
async fn scan_browser_file(scanner: Scanner, file: web_sys::File) -> Result<JsValue, JsValue> {
    let name = file.name();
    let mime = file.type_();
    let format = if mime.trim().is_empty() {
        DocumentFormat::from_path(Path::new(&name))
    } else {
        DocumentFormat::from_mime(&mime)
    }
    .map_err(to_js_error)?;

    let buffer = JsFuture::from(file.array_buffer()).await?;
    let document = Document::new(Uint8Array::new(&buffer).to_vec(), format);

    let mut ctx = ScanContext::new(name);
    scanner.scan(&document, &mut ctx).map_err(to_js_error)?;

    serde_wasm_bindgen::to_value(&ctx).map_err(to_js_error)
}

/// Contact scanner class for browser use.
#[wasm_bindgen]
pub struct ContactScanner {
    scanner: Scanner,
}

#[wasm_bindgen]
impl ContactScanner {
    /// Create a scanner with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            scanner: Scanner::new(),
        }
    }

    /// Create a scanner from a JSON configuration string.
    #[wasm_bindgen]
    pub fn with_config(config_json: &str) -> Result<ContactScanner, JsValue> {
        let config: DialscanConfig = serde_json::from_str(config_json).map_err(to_js_error)?;
        config.validate().map_err(to_js_error)?;
        Ok(Self {
            scanner: Scanner::from_config(&config),
        })
    }

    /// Extract contact numbers from document bytes.
    #[wasm_bindgen]
    pub fn extract(&self, data: &[u8], mime: &str) -> Result<Vec<String>, JsValue> {
        let document = Document::from_mime(data, mime).map_err(to_js_error)?;
        let mut ctx = ScanContext::new("document");
        let numbers = self.scanner.scan(&document, &mut ctx).map_err(to_js_error)?;
        Ok(numbers.as_strings())
    }

    /// Recognize contact numbers in plain text.
    #[wasm_bindgen]
    pub fn extract_from_text(&self, text: &str) -> Vec<String> {
        self.scanner.scan_text(text).as_strings()
    }

    /// Render the PDF report for a list of numbers.
    #[wasm_bindgen]
    pub fn render(&self, numbers: Vec<String>) -> Result<Vec<u8>, JsValue> {
        let numbers: ResultSet = numbers.iter().filter_map(|n| normalize(n)).collect();
        self.scanner.render_report(&numbers).map_err(to_js_error)
    }

    /// Suggested download name for a report, using the configured prefix.
    #[wasm_bindgen]
    pub fn report_file_name(&self) -> String {
        report_file_name_now(&self.scanner.config().report.file_prefix)
    }

    /// Scan a browser `File`, resolving to the scan summary.
    #[wasm_bindgen]
    pub fn scan_file(&self, file: web_sys::File) -> js_sys::Promise {
        wasm_bindgen_futures::future_to_promise(scan_browser_file(self.scanner.clone(), file))
    }
}

impl Default for ContactScanner {
    fn default() -> Self {
        Self::new()
    }
}
