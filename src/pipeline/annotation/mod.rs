//! Linguistic annotation: the contract the field heuristics depend on.
//!
//! Any pretrained model can sit behind [`LanguageAnnotator`]; the crate ships a
//! deterministic rule-based implementation so it runs without model downloads.

pub mod types;
pub mod rule_based;

pub use types::*;
pub use rule_based::*;

/// Produces tokens (with part-of-speech tags), entity spans and noun chunks.
///
/// Implementations are loaded once and shared read-only across workers.
pub trait LanguageAnnotator: Send + Sync {
    fn annotate(&self, text: &str) -> AnnotatedText;
}
