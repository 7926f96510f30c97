//! Page rasterisation with Google PDFium, used when a PDF's text layer cannot
//! be parsed and its pages have to be OCR'd instead.
//!
//! The upstream `Pdfium` handle is `!Send`, so the library is bound per call;
//! the renderer only remembers where to find it. Repeat `dlopen`s are cached
//! by the OS.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, ImageOutputFormat};
use pdfium_render::prelude::*;
use tracing::{debug, warn};

use super::types::PdfPageRenderer;
use super::ExtractionError;
use crate::config::ParserConfig;

/// Upper bound on either side of a rendered page, in pixels.
const MAX_DIMENSION_PX: u32 = 4096;

const POINTS_PER_INCH: f32 = 72.0;

pub struct PdfiumRenderer {
    library_path: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// Searches next to the executable, then the system library path.
    pub fn new() -> Self {
        Self { library_path: None }
    }

    /// Binds exactly `path`, with no fallback search.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        match &config.pdfium_library {
            Some(path) => Self::with_library(path.clone()),
            None => Self::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.bind().is_ok()
    }

    fn bind(&self) -> Result<Pdfium, ExtractionError> {
        if let Some(path) = &self.library_path {
            return Pdfium::bind_to_library(path)
                .map(Pdfium::new)
                .map_err(|e| {
                    ExtractionError::RendererUnavailable(format!(
                        "cannot load PDFium from {}: {e}",
                        path.display()
                    ))
                });
        }

        for candidate in bundled_library_candidates() {
            if let Ok(bindings) = Pdfium::bind_to_library(&candidate) {
                debug!(path = %candidate.display(), "Bound bundled PDFium");
                return Ok(Pdfium::new(bindings));
            }
        }

        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| {
                ExtractionError::RendererUnavailable(format!(
                    "PDFium not found next to the executable or on the system path \
                     (set PDFIUM_DYNAMIC_LIB_PATH): {e}"
                ))
            })
    }

    fn with_document<T>(
        &self,
        pdf_bytes: &[u8],
        f: impl FnOnce(&PdfDocument<'_>) -> Result<T, ExtractionError>,
    ) -> Result<T, ExtractionError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(classify_open_error)?;
        f(&document)
    }
}

impl Default for PdfiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `<exe_dir>/<libpdfium>` and `<exe_dir>/lib/<libpdfium>`.
fn bundled_library_candidates() -> Vec<PathBuf> {
    let Ok(exe) = std::env::current_exe() else {
        return Vec::new();
    };
    let Some(exe_dir) = exe.parent() else {
        return Vec::new();
    };
    [exe_dir.to_path_buf(), exe_dir.join("lib")]
        .iter()
        .map(|dir| Pdfium::pdfium_platform_library_name_at_path(dir.as_path()))
        .collect()
}

fn classify_open_error(e: PdfiumError) -> ExtractionError {
    match e {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            ExtractionError::PdfEncrypted
        }
        other => ExtractionError::PdfRendering {
            page: 0,
            reason: format!("cannot open document: {other}"),
        },
    }
}

/// Pixel size of a page rendered at a given DPI, shrunk uniformly so neither
/// side exceeds [`MAX_DIMENSION_PX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderSize {
    width: u32,
    height: u32,
    capped: bool,
}

impl RenderSize {
    fn for_page(width_pt: f32, height_pt: f32, dpi: u32) -> Self {
        let scale = dpi as f32 / POINTS_PER_INCH;
        let width = (width_pt * scale).max(1.0);
        let height = (height_pt * scale).max(1.0);
        let shrink = (MAX_DIMENSION_PX as f32 / width.max(height)).min(1.0);

        Self {
            width: ((width * shrink).round() as u32).clamp(1, MAX_DIMENSION_PX),
            height: ((height * shrink).round() as u32).clamp(1, MAX_DIMENSION_PX),
            capped: shrink < 1.0,
        }
    }
}

fn to_png(image: &DynamicImage) -> Result<Vec<u8>, ExtractionError> {
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encoding failed: {e}")))?;
    Ok(png.into_inner())
}

impl PdfPageRenderer for PdfiumRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        self.with_document(pdf_bytes, |document| Ok(document.pages().len() as usize))
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError> {
        let out_of_range = |count: usize| ExtractionError::PdfRendering {
            page: page_number,
            reason: format!("no such page (document has {count})"),
        };

        self.with_document(pdf_bytes, |document| {
            let pages = document.pages();
            let count = pages.len() as usize;
            let index = u16::try_from(page_number).map_err(|_| out_of_range(count))?;
            let page = pages.get(index).map_err(|_| out_of_range(count))?;

            let size = RenderSize::for_page(page.width().value, page.height().value, dpi);
            if size.capped {
                warn!(
                    page = page_number,
                    dpi,
                    width = size.width,
                    height = size.height,
                    "Page too large at requested DPI; rendering downscaled"
                );
            }

            let config = PdfRenderConfig::new()
                .set_target_width(size.width as i32)
                .set_maximum_height(size.height as i32);
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| ExtractionError::PdfRendering {
                    page: page_number,
                    reason: e.to_string(),
                })?;

            let png = to_png(&bitmap.as_image())?;
            debug!(page = page_number, bytes = png.len(), "Page rasterised");
            Ok(png)
        })
    }
}

// ── Mock for testing ──

/// Page renderer that never touches PDFium: every in-range page renders as a
/// blank 8x8 PNG. Counts renders so tests can assert OCR was (not) reached.
pub struct MockPdfPageRenderer {
    page_count: Option<usize>,
    renders: AtomicUsize,
}

impl MockPdfPageRenderer {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count: Some(page_count),
            renders: AtomicUsize::new(0),
        }
    }

    /// Behaves like a renderer whose library failed to load.
    pub fn unavailable() -> Self {
        Self {
            page_count: None,
            renders: AtomicUsize::new(0),
        }
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl PdfPageRenderer for MockPdfPageRenderer {
    fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        self.page_count
            .ok_or_else(|| ExtractionError::RendererUnavailable("mock renderer".into()))
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        _dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError> {
        let count = self.page_count(pdf_bytes)?;
        if page_number >= count {
            return Err(ExtractionError::PdfRendering {
                page: page_number,
                reason: format!("no such page (document has {count})"),
            });
        }
        self.renders.fetch_add(1, Ordering::SeqCst);
        to_png(&DynamicImage::new_luma8(8, 8))
    }
}
