use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "resume-parser";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rasterizer resolution used when a PDF has to be OCR'd.
pub const DEFAULT_RENDER_DPI: u32 = 200;

/// Tesseract language pack used for OCR.
pub const DEFAULT_OCR_LANG: &str = "eng";

/// Name (or path) of the tesseract executable.
pub const DEFAULT_TESSERACT_CMD: &str = "tesseract";

/// Directory walked by the batch driver when none is given.
pub const DEFAULT_RESUMES_DIR: &str = "resumes";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "resume_parser_lib=info,resume_parser=info,warn".to_string()
}

/// Runtime knobs for the extraction pipeline.
///
/// Every field can be overridden from the environment; see [`ParserConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub render_dpi: u32,
    pub ocr_language: String,
    pub tesseract_cmd: String,
    pub workers: usize,
    /// Explicit PDFium shared library; searched for when unset.
    pub pdfium_library: Option<PathBuf>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            render_dpi: DEFAULT_RENDER_DPI,
            ocr_language: DEFAULT_OCR_LANG.to_string(),
            tesseract_cmd: DEFAULT_TESSERACT_CMD.to_string(),
            workers: default_workers(),
            pdfium_library: None,
        }
    }
}

impl ParserConfig {
    /// Defaults, overridden by `RESUME_PARSER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env in production, a map in tests).
    /// Unparseable numeric values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("RESUME_PARSER_RENDER_DPI") {
            match raw.trim().parse::<u32>() {
                Ok(dpi) if dpi > 0 => config.render_dpi = dpi,
                _ => tracing::warn!(value = %raw, "Ignoring invalid RESUME_PARSER_RENDER_DPI"),
            }
        }

        if let Some(lang) = lookup("RESUME_PARSER_OCR_LANG") {
            if !lang.trim().is_empty() {
                config.ocr_language = lang.trim().to_string();
            }
        }

        if let Some(cmd) = lookup("RESUME_PARSER_TESSERACT") {
            if !cmd.trim().is_empty() {
                config.tesseract_cmd = cmd.trim().to_string();
            }
        }

        if let Some(raw) = lookup("RESUME_PARSER_WORKERS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.workers = n,
                _ => tracing::warn!(value = %raw, "Ignoring invalid RESUME_PARSER_WORKERS"),
            }
        }

        if let Some(path) = lookup("PDFIUM_DYNAMIC_LIB_PATH") {
            if !path.trim().is_empty() {
                config.pdfium_library = Some(PathBuf::from(path.trim()));
            }
        }

        config
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
