use super::encoding::resolve_and_decode;
use super::ocr::{extract_via_ocr, TesseractCli};
use super::pdf::{join_pages, PdfTextExtractor};
use super::pdf_renderer::PdfiumRenderer;
use super::types::{AcquiredText, ExtractionMethod, OcrEngine, PdfExtractor, PdfPageRenderer};
use super::ExtractionError;
use crate::config::{ParserConfig, DEFAULT_RENDER_DPI};
use crate::pipeline::source::{DocumentSource, SourceError};

/// Text acquisition: dispatches a document to structured PDF extraction, the
/// OCR fallback, or the encoding resolver, and always produces text.
///
/// Collaborators are trait objects so tests can inject mocks.
pub struct TextAcquisition {
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
    pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
    ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    render_dpi: u32,
}

/// Per-call states. Structured extraction is attempted once; OCR at most once.
enum AcquisitionState {
    Dispatch,
    Structured,
    OcrFallback(ExtractionError),
    Decode,
    Done(AcquiredText),
}

impl TextAcquisition {
    pub fn new(
        pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
        pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
        ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    ) -> Self {
        Self {
            pdf_extractor,
            pdf_renderer,
            ocr_engine,
            render_dpi: DEFAULT_RENDER_DPI,
        }
    }

    /// Production wiring: pdf-extract, PDFium, and the tesseract executable.
    /// Missing native dependencies surface lazily as OCR failures, not here.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(
            Box::new(PdfTextExtractor),
            Box::new(PdfiumRenderer::from_config(config)),
            Box::new(TesseractCli::from_config(config)),
        )
        .with_render_dpi(config.render_dpi)
    }

    pub fn with_render_dpi(mut self, dpi: u32) -> Self {
        self.render_dpi = dpi;
        self
    }

    pub fn pdf_extractor(&self) -> &dyn PdfExtractor {
        &*self.pdf_extractor
    }

    pub fn pdf_renderer(&self) -> &dyn PdfPageRenderer {
        &*self.pdf_renderer
    }

    /// Read `source` and acquire its text. Only usage errors (missing extension,
    /// unreadable path) are returned; the bytes are handed back for page counting.
    pub fn acquire_from_source(
        &self,
        source: &DocumentSource,
    ) -> Result<(AcquiredText, Vec<u8>), SourceError> {
        let extension = source.extension()?;
        let bytes = source.read_bytes()?;
        let acquired = self.acquire_text(&bytes, &extension);
        Ok((acquired, bytes))
    }

    /// Acquire text from already-materialized bytes. Never fails.
    pub fn acquire_text(&self, bytes: &[u8], extension: &str) -> AcquiredText {
        let mut state = AcquisitionState::Dispatch;
        loop {
            state = match state {
                AcquisitionState::Dispatch => {
                    if extension.eq_ignore_ascii_case("pdf") {
                        AcquisitionState::Structured
                    } else {
                        AcquisitionState::Decode
                    }
                }
                AcquisitionState::Structured => match self.pdf_extractor.extract_pages(bytes) {
                    Ok(pages) => {
                        tracing::debug!(pages = pages.len(), "Structured PDF extraction succeeded");
                        AcquisitionState::Done(AcquiredText {
                            text: join_pages(&pages),
                            method: ExtractionMethod::PdfStructured,
                        })
                    }
                    Err(e) => AcquisitionState::OcrFallback(e),
                },
                AcquisitionState::OcrFallback(cause) => {
                    tracing::warn!(error = %cause, "Could not read PDF; attempting OCR");
                    let text = extract_via_ocr(
                        bytes,
                        &*self.pdf_renderer,
                        &*self.ocr_engine,
                        self.render_dpi,
                    );
                    AcquisitionState::Done(AcquiredText {
                        text,
                        method: ExtractionMethod::PdfOcr,
                    })
                }
                AcquisitionState::Decode => {
                    let decoded = resolve_and_decode(bytes);
                    tracing::debug!(
                        encoding = decoded.encoding,
                        fallback = decoded.used_fallback,
                        "Decoded non-PDF document"
                    );
                    AcquisitionState::Done(AcquiredText {
                        text: decoded.text,
                        method: ExtractionMethod::PlainTextDecode,
                    })
                }
                AcquisitionState::Done(acquired) => return acquired,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::pipeline::extraction::ocr::MockOcrEngine;
    use crate::pipeline::extraction::pdf::test_pdfs::{make_pdf, make_text_pdf};
    use crate::pipeline::extraction::pdf_renderer::MockPdfPageRenderer;

    /// Mock PDF extractor that records how often it is called.
    struct CountingPdfExtractor {
        result: Result<Vec<String>, String>,
        calls: Arc<AtomicUsize>,
    }

    impl PdfExtractor for CountingPdfExtractor {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(ExtractionError::PdfParsing)
        }

        fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
            self.result
                .as_ref()
                .map(|p| p.len())
                .map_err(|e| ExtractionError::PdfParsing(e.clone()))
        }
    }

    fn acquisition(
        result: Result<Vec<String>, String>,
        ocr: Arc<MockOcrEngine>,
        ocr_pages: usize,
    ) -> (TextAcquisition, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let acq = TextAcquisition::new(
            Box::new(CountingPdfExtractor {
                result,
                calls: calls.clone(),
            }),
            Box::new(MockPdfPageRenderer::new(ocr_pages)),
            Box::new(ocr),
        );
        (acq, calls)
    }

    #[test]
    fn structured_success_concatenates_pages_without_ocr() {
        let ocr = Arc::new(MockOcrEngine::new("OCR TEXT"));
        let (acq, calls) = acquisition(
            Ok(vec!["Jane Doe\n".into(), "Rust, SQL".into()]),
            ocr.clone(),
            2,
        );

        let acquired = acq.acquire_text(b"%PDF", "pdf");
        assert_eq!(acquired.text, "Jane Doe\nRust, SQL");
        assert_eq!(acquired.method, ExtractionMethod::PdfStructured);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn parse_failure_falls_back_to_ocr_once() {
        let ocr = Arc::new(MockOcrEngine::with_pages(&["Page one ", "page two"]));
        let (acq, calls) = acquisition(Err("corrupt xref".into()), ocr.clone(), 2);

        let acquired = acq.acquire_text(b"garbage", "pdf");
        assert_eq!(acquired.text, "Page one page two");
        assert_eq!(acquired.method, ExtractionMethod::PdfOcr);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "structured extraction attempted exactly once");
        assert_eq!(ocr.calls(), 2);
    }

    #[test]
    fn valid_but_empty_pdf_does_not_trigger_ocr() {
        let ocr = Arc::new(MockOcrEngine::new("should not appear"));
        let (acq, _calls) = acquisition(Ok(vec![String::new(), String::new()]), ocr.clone(), 2);

        let acquired = acq.acquire_text(b"%PDF", "pdf");
        assert_eq!(acquired.text, "");
        assert_eq!(acquired.method, ExtractionMethod::PdfStructured);
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn ocr_failure_yields_empty_text() {
        let ocr = Arc::new(MockOcrEngine::failing());
        let (acq, _calls) = acquisition(Err("bad header".into()), ocr, 1);

        let acquired = acq.acquire_text(b"garbage", "pdf");
        assert_eq!(acquired.text, "");
        assert_eq!(acquired.method, ExtractionMethod::PdfOcr);
    }

    #[test]
    fn non_pdf_goes_through_encoding_resolver() {
        let ocr = Arc::new(MockOcrEngine::new("unused"));
        let (acq, calls) = acquisition(Ok(vec![]), ocr.clone(), 0);

        let acquired = acq.acquire_text("Zoë Müller\nRust".as_bytes(), "txt");
        assert_eq!(acquired.text, "Zoë Müller\nRust");
        assert_eq!(acquired.method, ExtractionMethod::PlainTextDecode);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn non_pdf_with_invalid_bytes_still_decodes() {
        let ocr = Arc::new(MockOcrEngine::new("unused"));
        let (acq, _calls) = acquisition(Ok(vec![]), ocr, 0);
        let acquired = acq.acquire_text(&[0xC3, 0x28, 0xA0, 0x41], "doc");
        assert!(acquired.text.ends_with('A'));
    }

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        let ocr = Arc::new(MockOcrEngine::new("unused"));
        let (acq, calls) = acquisition(Ok(vec!["text".into()]), ocr, 1);
        let acquired = acq.acquire_text(b"%PDF", "PDF");
        assert_eq!(acquired.method, ExtractionMethod::PdfStructured);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn real_extractor_on_generated_pdf() {
        let acq = TextAcquisition::new(
            Box::new(PdfTextExtractor),
            Box::new(MockPdfPageRenderer::new(1)),
            Box::new(MockOcrEngine::new("OCR")),
        );
        let acquired = acq.acquire_text(&make_text_pdf("Jane Doe"), "pdf");
        assert_eq!(acquired.method, ExtractionMethod::PdfStructured);
        assert!(acquired.text.contains("Jane"));
    }

    #[test]
    fn real_extractor_empty_pdf_skips_ocr() {
        let ocr = Arc::new(MockOcrEngine::new("OCR"));
        let acq = TextAcquisition::new(
            Box::new(PdfTextExtractor),
            Box::new(MockPdfPageRenderer::new(1)),
            Box::new(ocr.clone()),
        );
        let acquired = acq.acquire_text(&make_pdf(&[None]), "pdf");
        assert_eq!(acquired.method, ExtractionMethod::PdfStructured);
        assert!(acquired.text.trim().is_empty());
        assert_eq!(ocr.calls(), 0);
    }

    #[test]
    fn real_extractor_garbage_uses_ocr() {
        let acq = TextAcquisition::new(
            Box::new(PdfTextExtractor),
            Box::new(MockPdfPageRenderer::new(1)),
            Box::new(MockOcrEngine::new("Recovered by OCR")),
        );
        let acquired = acq.acquire_text(b"%PDF-1.4 this is not really a pdf", "pdf");
        assert_eq!(acquired.method, ExtractionMethod::PdfOcr);
        assert_eq!(acquired.text, "Recovered by OCR");
    }

    #[test]
    fn acquire_from_source_reports_usage_errors() {
        let acq = TextAcquisition::new(
            Box::new(PdfTextExtractor),
            Box::new(MockPdfPageRenderer::new(0)),
            Box::new(MockOcrEngine::new("")),
        );

        let no_ext = DocumentSource::from_bytes("resume", b"Jane".to_vec());
        assert!(matches!(
            acq.acquire_from_source(&no_ext),
            Err(SourceError::MissingExtension(_))
        ));

        let missing = DocumentSource::from_path("/no/such/dir/resume.pdf");
        assert!(matches!(
            acq.acquire_from_source(&missing),
            Err(SourceError::Io { .. })
        ));

        let ok = DocumentSource::from_bytes("resume.txt", b"Jane".to_vec());
        let (acquired, bytes) = acq.acquire_from_source(&ok).unwrap();
        assert_eq!(acquired.text, "Jane");
        assert_eq!(bytes, b"Jane");
    }
}
