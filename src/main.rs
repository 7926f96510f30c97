use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use resume_parser_lib::config::{self, ParserConfig};
use resume_parser_lib::pipeline::batch::{collect_documents, run_batch, BatchSummary};
use resume_parser_lib::pipeline::extraction::missing_ocr_tools;
use resume_parser_lib::{init_tracing, CandidateRecord, ResumeParser};

/// Extract candidate records from every resume in a directory.
#[derive(Parser, Debug)]
#[command(name = config::APP_NAME, version = config::APP_VERSION)]
struct Cli {
    /// Directory of resumes (PDF or text), searched recursively
    #[arg(default_value = config::DEFAULT_RESUMES_DIR)]
    dir: PathBuf,

    /// Maximum documents parsed at once (overrides RESUME_PARSER_WORKERS)
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut parser_config = ParserConfig::from_env();
    if let Some(workers) = cli.workers {
        parser_config.workers = workers;
    }
    tracing::info!(
        "{} v{} reading {}",
        config::APP_NAME,
        config::APP_VERSION,
        cli.dir.display()
    );

    let documents = match collect_documents(&cli.dir) {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!(error = %e, "Cannot list resumes");
            return ExitCode::FAILURE;
        }
    };

    for tool in missing_ocr_tools(&parser_config) {
        tracing::warn!(tool, "OCR fallback unavailable; scanned PDFs will yield empty records");
    }

    let parser = Arc::new(ResumeParser::from_config(&parser_config));
    let outcomes = run_batch(parser, documents, parser_config.workers).await;
    let summary = BatchSummary::from_outcomes(&outcomes);

    let records: Vec<CandidateRecord> = outcomes
        .into_iter()
        .filter_map(|outcome| outcome.result.ok())
        .collect();

    match serde_json::to_string_pretty(&records) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize records");
            return ExitCode::FAILURE;
        }
    }

    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, total = summary.total, "Some resumes were not parsed");
    }
    ExitCode::SUCCESS
}
