use super::extraction::{PdfExtractor, PdfPageRenderer};

/// Page count reported for every non-PDF document, whatever its length.
pub const NON_PDF_PAGE_COUNT: usize = 1;

/// Number of pages in a document.
///
/// PDFs are re-opened from their bytes, independent of any earlier extraction
/// attempt. A PDF the parser cannot open is asked of the renderer next, and
/// counts as 0 pages if neither can read it.
pub fn count_pages(
    bytes: &[u8],
    is_pdf: bool,
    pdf_extractor: &dyn PdfExtractor,
    pdf_renderer: &dyn PdfPageRenderer,
) -> usize {
    if !is_pdf {
        return NON_PDF_PAGE_COUNT;
    }

    match pdf_extractor.page_count(bytes) {
        Ok(count) => count,
        Err(parse_err) => match pdf_renderer.page_count(bytes) {
            Ok(count) => {
                tracing::debug!(error = %parse_err, pages = count, "Page count taken from renderer");
                count
            }
            Err(render_err) => {
                tracing::warn!(
                    parse_error = %parse_err,
                    render_error = %render_err,
                    "Could not count PDF pages"
                );
                0
            }
        },
    }
}
