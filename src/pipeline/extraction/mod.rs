pub mod types;
pub mod encoding;
pub mod sanitize;
pub mod pdf;
pub mod pdf_renderer;
pub mod ocr;
pub mod orchestrator;

pub use types::*;
pub use encoding::*;
pub use sanitize::*;
pub use pdf::*;
pub use pdf_renderer::*;
pub use ocr::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF is password-protected")]
    PdfEncrypted,

    #[error("PDF renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("PDF rendering failed on page {page}: {reason}")]
    PdfRendering { page: usize, reason: String },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),
}
