use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PdfStructured,
    PdfOcr,
    PlainTextDecode,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PdfStructured => "pdf_structured",
            Self::PdfOcr => "pdf_ocr",
            Self::PlainTextDecode => "plain_text_decode",
        }
    }
}

/// Raw text of one document, before whitespace collapsing.
/// Extraction failures yield an empty `text`, never an absent one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcquiredText {
    pub text: String,
    pub method: ExtractionMethod,
}

/// Layout-aware PDF text extraction.
///
/// `extract_pages` must return `Err(ExtractionError::PdfParsing)` (or `PdfEncrypted`)
/// for documents that cannot be parsed, and `Ok` with empty strings for valid pages
/// that simply carry no text.
pub trait PdfExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;
}

/// Rasterizes PDF pages to PNG for OCR.
pub trait PdfPageRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Render a zero-indexed page at `dpi` and return PNG bytes.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// Optical character recognition over a single page image.
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Shared engines (e.g. one instance observed by a test and used by the pipeline).
impl<T: OcrEngine + ?Sized> OcrEngine for Arc<T> {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        (**self).ocr_image(image_bytes)
    }
}
