pub mod config;
pub mod pipeline;

pub use pipeline::parser::{ParseError, ParsedDocument, ResumeParser};
pub use pipeline::record::CandidateRecord;
pub use pipeline::source::{DocumentSource, SourceError};

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Logs go to stderr so stdout stays reserved for parsed records.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
