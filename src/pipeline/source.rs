use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors caused by a malformed request rather than by document content.
/// These are never recovered inside the pipeline.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Document has no file extension: {0}")]
    MissingExtension(String),

    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A document to parse: a file on disk or an in-memory upload carrying its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Buffer { file_name: String, bytes: Vec<u8> },
}

impl DocumentSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Human-readable name used in logs.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Buffer { file_name, .. } => file_name.clone(),
        }
    }

    /// Lowercased extension without the dot (`"pdf"`, `"txt"`).
    pub fn extension(&self) -> Result<String, SourceError> {
        let ext = match self {
            Self::Path(path) => extension_of(path),
            Self::Buffer { file_name, .. } => extension_of(Path::new(file_name)),
        };
        ext.ok_or_else(|| SourceError::MissingExtension(self.display_name()))
    }

    pub fn is_pdf(&self) -> Result<bool, SourceError> {
        Ok(self.extension()? == "pdf")
    }

    /// Materialize the full byte content.
    pub fn read_bytes(&self) -> Result<Vec<u8>, SourceError> {
        match self {
            Self::Path(path) => std::fs::read(path).map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            }),
            Self::Buffer { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}
