//! Batch driver: parse every document under a directory on a bounded pool of
//! blocking workers.
//!
//! Workers share one read-only [`ResumeParser`]; each parse runs to completion
//! independently, and a failure only affects its own document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use walkdir::WalkDir;

use super::parser::{ParseError, ResumeParser};
use super::record::CandidateRecord;
use super::source::DocumentSource;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Cannot read directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Worker for {path} did not finish: {reason}")]
    Worker { path: PathBuf, reason: String },
}

/// Result of one document in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<CandidateRecord, BatchError>,
}

/// Totals reported once a batch completes.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub parsed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let parsed = outcomes.iter().filter(|o| o.result.is_ok()).count();
        Self {
            total: outcomes.len(),
            parsed,
            failed: outcomes.len() - parsed,
        }
    }
}

/// Every regular file below `dir`, recursively, sorted by path.
///
/// An unreadable `dir` is an error; unreadable entries below it are skipped.
pub fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => documents.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() == 0 => {
                return Err(BatchError::Walk {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => tracing::warn!(error = %e, "Skipping unreadable entry"),
        }
    }
    documents.sort();
    Ok(documents)
}

/// Parse `documents` with at most `workers` parses in flight.
///
/// Outcomes come back in input order, one per document.
pub async fn run_batch(
    parser: Arc<ResumeParser>,
    documents: Vec<PathBuf>,
    workers: usize,
) -> Vec<BatchOutcome> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    tracing::info!(documents = documents.len(), workers = workers.max(1), "Starting batch");

    let mut pending = Vec::with_capacity(documents.len());
    for path in documents {
        let handle = match semaphore.clone().acquire_owned().await {
            Ok(permit) => {
                let parser = parser.clone();
                let worker_path = path.clone();
                Ok(tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    parser.parse(&DocumentSource::from_path(worker_path))
                }))
            }
            Err(e) => Err(e.to_string()),
        };
        pending.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for (path, handle) in pending {
        let result = match handle {
            Ok(handle) => match handle.await {
                Ok(parsed) => parsed.map_err(BatchError::from),
                Err(e) => Err(BatchError::Worker {
                    path: path.clone(),
                    reason: e.to_string(),
                }),
            },
            Err(reason) => Err(BatchError::Worker {
                path: path.clone(),
                reason,
            }),
        };
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "Document failed");
        }
        outcomes.push(BatchOutcome { path, result });
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    tracing::info!(
        total = summary.total,
        parsed = summary.parsed,
        failed = summary.failed,
        "Batch complete"
    );
    outcomes
}
