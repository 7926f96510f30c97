//! Resume parser: the single entry point that turns a document into a
//! [`CandidateRecord`].
//!
//! Drives acquire → collapse whitespace → annotate → extract fields → count
//! pages → assemble. Every collaborator is injected, so the parser holds no
//! mutable state and can be shared by concurrent workers.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::annotation::{LanguageAnnotator, RuleBasedAnnotator};
use super::extraction::{collapse_whitespace, ExtractionMethod, TextAcquisition};
use super::fields::extract_fields;
use super::pages::count_pages;
use super::record::CandidateRecord;
use super::source::{DocumentSource, SourceError};
use crate::config::ParserConfig;

/// Errors that stop a single document. Content problems never reach here;
/// they degrade to an under-populated record instead.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A record together with the diagnostics of how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub record: CandidateRecord,
    /// Acquired text before whitespace collapsing.
    pub raw_text: String,
    pub method: ExtractionMethod,
}

pub struct ResumeParser {
    acquisition: TextAcquisition,
    annotator: Arc<dyn LanguageAnnotator>,
}

impl ResumeParser {
    pub fn new(acquisition: TextAcquisition, annotator: Arc<dyn LanguageAnnotator>) -> Self {
        Self {
            acquisition,
            annotator,
        }
    }

    /// Production wiring with the rule-based annotator.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(
            TextAcquisition::from_config(config),
            Arc::new(RuleBasedAnnotator::new()),
        )
    }

    pub fn parse(&self, source: &DocumentSource) -> Result<CandidateRecord, ParseError> {
        self.parse_detailed(source).map(|parsed| parsed.record)
    }

    pub fn parse_detailed(&self, source: &DocumentSource) -> Result<ParsedDocument, ParseError> {
        let document = source.display_name();
        let is_pdf = source.is_pdf()?;
        let (acquired, bytes) = self.acquisition.acquire_from_source(source)?;

        let normalized = collapse_whitespace(&acquired.text);
        let annotated = self.annotator.annotate(&normalized);
        let fields = extract_fields(&annotated);

        let no_of_pages = count_pages(
            &bytes,
            is_pdf,
            self.acquisition.pdf_extractor(),
            self.acquisition.pdf_renderer(),
        );

        tracing::info!(
            document = %document,
            method = acquired.method.as_str(),
            chars = normalized.len(),
            pages = no_of_pages,
            has_name = fields.name.is_some(),
            has_email = fields.email.is_some(),
            has_mobile = fields.mobile_number.is_some(),
            skills = fields.skills.len(),
            "Resume parsed"
        );

        Ok(ParsedDocument {
            record: CandidateRecord::assemble(fields, no_of_pages),
            raw_text: acquired.text,
            method: acquired.method,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::pipeline::extraction::pdf::test_pdfs::{make_pdf, make_text_pdf};
    use crate::pipeline::extraction::{MockOcrEngine, MockPdfPageRenderer, PdfTextExtractor};

    fn parser_with_ocr(ocr: MockOcrEngine, pages: usize) -> ResumeParser {
        ResumeParser::new(
            TextAcquisition::new(
                Box::new(PdfTextExtractor),
                Box::new(MockPdfPageRenderer::new(pages)),
                Box::new(ocr),
            ),
            Arc::new(RuleBasedAnnotator::new()),
        )
    }

    fn parser() -> ResumeParser {
        parser_with_ocr(MockOcrEngine::failing(), 1)
    }

    const RESUME: &str = "Jane Doe\n\nEmail:   jane.doe@example.com\nPhone: 5551234567\n\
                          experienced developer with sql skills\n";

    #[test]
    fn text_resume_produces_full_record() {
        let source = DocumentSource::from_bytes("jane.txt", RESUME.as_bytes());
        let record = parser().parse(&source).unwrap();

        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(record.mobile_number.as_deref(), Some("5551234567"));
        assert!(record.skills.contains(&"developer".to_string()));
        assert!(record.skills.contains(&"sql".to_string()));
        assert_eq!(record.degree, None);
        assert_eq!(record.no_of_pages, 1);
    }

    #[test]
    fn detailed_parse_keeps_raw_text_and_method() {
        let source = DocumentSource::from_bytes("jane.txt", RESUME.as_bytes());
        let parsed = parser().parse_detailed(&source).unwrap();
        assert_eq!(parsed.raw_text, RESUME);
        assert_eq!(parsed.method, ExtractionMethod::PlainTextDecode);
    }

    #[test]
    fn structured_pdf_counts_its_pages() {
        let pdf = make_pdf(&[Some("Jane Doe"), Some("rust")]);
        let source = DocumentSource::from_bytes("resume.pdf", pdf);
        let parsed = parser().parse_detailed(&source).unwrap();
        assert_eq!(parsed.method, ExtractionMethod::PdfStructured);
        assert_eq!(parsed.record.no_of_pages, 2);
    }

    #[test]
    fn broken_pdf_uses_ocr_text() {
        let parser = parser_with_ocr(MockOcrEngine::new("John Smith john@smith.io "), 2);
        let source = DocumentSource::from_bytes("scan.pdf", b"%PDF-1.4 broken".to_vec());
        let parsed = parser.parse_detailed(&source).unwrap();

        assert_eq!(parsed.method, ExtractionMethod::PdfOcr);
        assert_eq!(parsed.record.name.as_deref(), Some("John Smith"));
        assert_eq!(parsed.record.email.as_deref(), Some("john@smith.io"));
        assert_eq!(parsed.record.no_of_pages, 2);
    }

    #[test]
    fn failed_ocr_yields_empty_record() {
        let source = DocumentSource::from_bytes("scan.pdf", b"garbage".to_vec());
        let record = parser().parse(&source).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.email, None);
        assert_eq!(record.mobile_number, None);
        assert!(record.skills.is_empty());
    }

    #[test]
    fn parsing_twice_is_idempotent() {
        let parser = parser();
        let text_source = DocumentSource::from_bytes("a.txt", RESUME.as_bytes());
        let pdf_source = DocumentSource::from_bytes("a.pdf", make_text_pdf("Jane Doe sql"));

        assert_eq!(
            parser.parse(&text_source).unwrap(),
            parser.parse(&text_source).unwrap()
        );
        assert_eq!(
            parser.parse(&pdf_source).unwrap(),
            parser.parse(&pdf_source).unwrap()
        );
    }

    #[test]
    fn path_source_is_read_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(RESUME.as_bytes()).unwrap();

        let record = parser()
            .parse(&DocumentSource::from_path(file.path()))
            .unwrap();
        assert_eq!(record.email.as_deref(), Some("jane.doe@example.com"));
    }

    #[test]
    fn usage_errors_propagate() {
        let err = parser()
            .parse(&DocumentSource::from_bytes("README", b"text".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ParseError::Source(SourceError::MissingExtension(_))));

        let err = parser()
            .parse(&DocumentSource::from_path("/nonexistent/resume.pdf"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Source(SourceError::Io { .. })));
    }

    #[test]
    fn parser_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResumeParser>();
    }
}
