use std::io::Write;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::pdf_renderer::PdfiumRenderer;
use super::types::{OcrEngine, PdfPageRenderer};
use super::ExtractionError;
use crate::config::ParserConfig;

/// Tesseract OCR through the `tesseract` executable.
///
/// Each page image is written to a temporary PNG and recognized with
/// `tesseract <image> stdout -l <lang>`.
pub struct TesseractCli {
    command: String,
    language: String,
}

impl TesseractCli {
    pub fn new(command: &str, language: &str) -> Self {
        Self {
            command: command.to_string(),
            language: language.to_string(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(&config.tesseract_cmd, &config.ocr_language)
    }

    /// Whether the configured executable can be launched at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractCli {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut image_file = tempfile::Builder::new()
            .prefix("resume-page-")
            .suffix(".png")
            .tempfile()?;
        image_file.write_all(image_bytes)?;
        image_file.flush()?;

        let output = Command::new(&self.command)
            .arg(image_file.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionError::OcrUnavailable(format!(
                        "'{}' not found. Install tesseract-ocr or set RESUME_PARSER_TESSERACT",
                        self.command
                    ))
                } else {
                    ExtractionError::OcrProcessing(format!("Failed to launch tesseract: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::OcrProcessing(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Mock OCR engine for unit testing without Tesseract.
///
/// Returns the configured page texts in call order (the last one repeats),
/// counts invocations, and can be told to fail.
pub struct MockOcrEngine {
    pages: Vec<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self::with_pages(&[text])
    }

    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            pages: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExtractionError::OcrUnavailable("mock OCR engine".into()));
        }
        let idx = call.min(self.pages.len().saturating_sub(1));
        Ok(self.pages.get(idx).cloned().unwrap_or_default())
    }
}

/// Which parts of the OCR fallback cannot run with `config`.
///
/// Empty when both Tesseract and PDFium load. Parsing still works without
/// them; unreadable PDFs just come back with empty text.
pub fn missing_ocr_tools(config: &ParserConfig) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !TesseractCli::from_config(config).is_available() {
        missing.push("tesseract");
    }
    if !PdfiumRenderer::from_config(config).is_available() {
        missing.push("pdfium");
    }
    missing
}

/// Rasterize every page in order and OCR each one, concatenating with no separator.
/// Any failure aborts the whole run.
pub fn ocr_pdf_pages(
    pdf_bytes: &[u8],
    renderer: &dyn PdfPageRenderer,
    ocr_engine: &dyn OcrEngine,
    dpi: u32,
) -> Result<String, ExtractionError> {
    let page_count = renderer.page_count(pdf_bytes)?;
    let mut text = String::new();

    for page_idx in 0..page_count {
        let image = renderer.render_page(pdf_bytes, page_idx, dpi)?;
        let page_text = ocr_engine.ocr_image(&image)?;
        tracing::debug!(
            page = page_idx + 1,
            chars = page_text.len(),
            "OCR page complete"
        );
        text.push_str(&page_text);
    }

    Ok(text)
}

/// OCR fallback for PDFs whose structure could not be parsed.
///
/// Best-effort: rendering or recognition errors degrade to an empty string and
/// are reported as a warning.
pub fn extract_via_ocr(
    pdf_bytes: &[u8],
    renderer: &dyn PdfPageRenderer,
    ocr_engine: &dyn OcrEngine,
    dpi: u32,
) -> String {
    match ocr_pdf_pages(pdf_bytes, renderer, ocr_engine, dpi) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "OCR failed");
            String::new()
        }
    }
}
