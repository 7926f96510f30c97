//! Field heuristics over normalised, annotated resume text.
//!
//! Each extractor is independent of the others. A missing match is an
//! ordinary outcome (`None` or an empty list), never an error.

use std::sync::LazyLock;

use regex::Regex;

use super::annotation::{AnnotatedText, EntityLabel, PartOfSpeech};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// Exactly ten digits between word boundaries. No separators or country codes.
static MOBILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{10}\b").unwrap());

/// Fields derived from one document's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub skills: Vec<String>,
}

pub fn extract_fields(annotated: &AnnotatedText) -> ExtractedFields {
    ExtractedFields {
        name: extract_name(annotated),
        email: extract_email(&annotated.text),
        mobile_number: extract_mobile_number(&annotated.text),
        skills: extract_skills(annotated),
    }
}

/// Text of the first PERSON entity in document order.
pub fn extract_name(annotated: &AnnotatedText) -> Option<String> {
    annotated
        .entities_with_label(EntityLabel::Person)
        .next()
        .map(|e| e.text.clone())
}

/// Leftmost email-shaped substring.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// Leftmost standalone run of exactly ten digits.
pub fn extract_mobile_number(text: &str) -> Option<String> {
    MOBILE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// Every common-noun token, in order, duplicates kept.
pub fn extract_skills(annotated: &AnnotatedText) -> Vec<String> {
    annotated
        .tokens_with_pos(PartOfSpeech::Noun)
        .map(|t| t.text.clone())
        .collect()
}
