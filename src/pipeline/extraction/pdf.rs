use std::panic::{self, AssertUnwindSafe};

use super::types::PdfExtractor;
use super::ExtractionError;

/// Reads the embedded text layer with `pdf-extract`, one string per page.
/// Pages that carry no text come back as empty strings, not errors.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed font and content streams instead of
        // returning an error; treat those the same as a parse failure.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(map_extract_error(e.to_string())),
            Err(_) => Err(ExtractionError::PdfParsing(
                "PDF text extractor panicked on malformed content".into(),
            )),
        }
    }

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        let doc = lopdf::Document::load_mem(pdf_bytes)
            .map_err(|e| map_extract_error(e.to_string()))?;
        Ok(doc.get_pages().len())
    }
}

/// Map extractor errors, detecting encrypted PDFs.
fn map_extract_error(msg: String) -> ExtractionError {
    let lower = msg.to_lowercase();
    if lower.contains("password") || lower.contains("encrypt") || lower.contains("decrypt") {
        ExtractionError::PdfEncrypted
    } else {
        ExtractionError::PdfParsing(msg)
    }
}

/// Concatenate page texts in order with no separator.
pub fn join_pages(pages: &[String]) -> String {
    pages.concat()
}

#[cfg(test)]
pub(crate) mod test_pdfs;
