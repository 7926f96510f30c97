//! Deterministic, dictionary-and-suffix annotator.
//!
//! Tokens come from Unicode word boundaries (UAX #29). Parts of speech are
//! assigned from closed-class lexicons first, then capitalisation, then
//! derivational suffixes. Entities are capitalised runs: runs containing an
//! organisation suffix become ORG, short runs of name-shaped words become PERSON.

use unicode_segmentation::UnicodeSegmentation;

use super::types::{AnnotatedText, EntityLabel, EntitySpan, NounChunk, PartOfSpeech, Token};
use super::LanguageAnnotator;

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "any",
    "some", "no", "all", "both", "either", "neither", "another", "my", "your",
    "his", "her", "its", "our", "their",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "she", "it", "we", "us", "they", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who",
    "whom", "whose", "which", "what", "mine", "yours", "hers", "ours", "theirs",
];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up",
    "down", "of", "off", "over", "under", "via", "within", "without", "across",
    "among", "per", "since", "until", "upon", "as", "like", "including",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "while", "whereas", "although",
    "because", "if", "unless", "whether", "than",
];

const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "will", "would", "shall", "should", "can",
    "could", "may", "might", "must",
];

const ADVERBS: &[&str] = &[
    "not", "very", "also", "well", "too", "now", "then", "here", "there",
    "always", "never", "often", "just", "only", "still", "already", "even",
    "again",
];

const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "hundred", "thousand", "million",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish"];

const SYMBOLS: &[char] = &['@', '+', '$', '%', '#', '&', '*', '=', '<', '>', '|', '~', '^', '©', '®', '€', '£'];

/// Trailing words that mark a capitalised run as an organisation name.
const ORGANIZATION_SUFFIXES: &[&str] = &[
    "inc", "ltd", "llc", "llp", "plc", "gmbh", "corp", "corporation", "company",
    "co", "university", "college", "institute", "school", "academy",
    "technologies", "solutions", "systems", "labs", "group", "bank", "foundation",
];

/// Words joining capitalised parts of an organisation name.
const ORGANIZATION_CONNECTORS: &[&str] = &["of", "&", "and"];

/// Capitalised words that head resume sections or name roles, places in time
/// and common technologies, none of which start a person's name.
const NAME_STOPLIST: &[&str] = &[
    "resume", "curriculum", "vitae", "cv", "profile", "summary", "objective",
    "contact", "email", "phone", "mobile", "address", "skills", "experience",
    "education", "projects", "certifications", "certificates", "languages",
    "references", "interests", "hobbies", "achievements", "awards", "work",
    "professional", "technical", "personal", "details", "information",
    "employment", "history", "career", "senior", "junior", "lead", "principal",
    "software", "engineer", "developer", "manager", "analyst", "consultant",
    "intern", "director", "associate", "present", "current", "january",
    "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday", "dear", "mr", "mrs", "ms", "dr",
    "python", "java", "javascript", "typescript", "rust", "go", "ruby", "linux",
    "windows", "microsoft", "google", "amazon", "github",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedAnnotator;

impl RuleBasedAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageAnnotator for RuleBasedAnnotator {
    fn annotate(&self, text: &str) -> AnnotatedText {
        let tokens = tokenize(text);

        let organizations = organization_runs(text, &tokens);
        let persons: Vec<(usize, usize)> = person_runs(text, &tokens)
            .into_iter()
            .filter(|run| !organizations.iter().any(|org| overlaps(*run, *org)))
            .collect();

        let mut entities: Vec<EntitySpan> = organizations
            .iter()
            .map(|run| entity(text, &tokens, *run, EntityLabel::Organization))
            .chain(
                persons
                    .iter()
                    .map(|run| entity(text, &tokens, *run, EntityLabel::Person)),
            )
            .collect();
        entities.sort_by_key(|e| e.start);

        let noun_chunks = noun_chunks(text, &tokens);

        tracing::trace!(
            tokens = tokens.len(),
            entities = entities.len(),
            noun_chunks = noun_chunks.len(),
            "Text annotated"
        );

        AnnotatedText {
            text: text.to_string(),
            tokens,
            entities,
            noun_chunks,
        }
    }
}

// ── Tokens and tags ──

fn tokenize(text: &str) -> Vec<Token> {
    text.split_word_bound_indices()
        .filter(|(_, word)| !word.chars().all(char::is_whitespace))
        .map(|(start, word)| Token {
            text: word.to_string(),
            pos: tag(word),
            start,
            end: start + word.len(),
        })
        .collect()
}

fn tag(word: &str) -> PartOfSpeech {
    if !word.chars().any(char::is_alphanumeric) {
        return if word.chars().all(|c| SYMBOLS.contains(&c)) {
            PartOfSpeech::Symbol
        } else {
            PartOfSpeech::Punctuation
        };
    }
    if word
        .chars()
        .all(|c| c.is_numeric() || matches!(c, '.' | ',' | ':'))
    {
        return PartOfSpeech::Numeral;
    }

    let lower = word.to_lowercase();
    if let Some(pos) = closed_class(&lower) {
        return pos;
    }
    if starts_uppercase(word) {
        return PartOfSpeech::ProperNoun;
    }
    suffix_tag(&lower)
}

fn closed_class(lower: &str) -> Option<PartOfSpeech> {
    let lexicons: [(&[&str], PartOfSpeech); 7] = [
        (DETERMINERS, PartOfSpeech::Determiner),
        (PRONOUNS, PartOfSpeech::Pronoun),
        (ADPOSITIONS, PartOfSpeech::Adposition),
        (CONJUNCTIONS, PartOfSpeech::Conjunction),
        (AUXILIARIES, PartOfSpeech::Auxiliary),
        (ADVERBS, PartOfSpeech::Adverb),
        (NUMBER_WORDS, PartOfSpeech::Numeral),
    ];
    lexicons
        .iter()
        .find(|(words, _)| words.contains(&lower))
        .map(|(_, pos)| *pos)
}

fn suffix_tag(lower: &str) -> PartOfSpeech {
    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        PartOfSpeech::Adverb
    } else if (len > 5 && lower.ends_with("ing")) || (len > 4 && lower.ends_with("ed")) {
        PartOfSpeech::Verb
    } else if len > 5 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        PartOfSpeech::Adjective
    } else {
        PartOfSpeech::Noun
    }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Capitalised, at least one lowercase letter, letters and apostrophes only.
fn is_name_like(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest: Vec<char> = chars.collect();
    first.is_uppercase()
        && rest.iter().any(|c| c.is_lowercase())
        && rest.iter().all(|c| c.is_alphabetic() || *c == '\'')
}

fn is_stoplisted(word: &str) -> bool {
    NAME_STOPLIST.contains(&word.to_lowercase().as_str())
}

// ── Spans ──

/// Tokens separated only by spaces or tabs (a line break ends a span).
fn same_line(text: &str, prev: &Token, next: &Token) -> bool {
    text[prev.end..next.start]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

/// Like [`same_line`], but requires at least one separating space.
fn spaced_on_same_line(text: &str, prev: &Token, next: &Token) -> bool {
    next.start > prev.end && same_line(text, prev, next)
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn entity(text: &str, tokens: &[Token], (from, to): (usize, usize), label: EntityLabel) -> EntitySpan {
    let start = tokens[from].start;
    let end = tokens[to - 1].end;
    EntitySpan {
        text: text[start..end].to_string(),
        label,
        start,
        end,
    }
}

/// Token index ranges `[from, to)` of capitalised runs that contain an organisation suffix.
fn organization_runs(text: &str, tokens: &[Token]) -> Vec<(usize, usize)> {
    let is_proper = |i: usize| tokens[i].pos == PartOfSpeech::ProperNoun;
    let is_connector =
        |i: usize| ORGANIZATION_CONNECTORS.contains(&tokens[i].text.to_lowercase().as_str());

    let mut runs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !is_proper(i) {
            i += 1;
            continue;
        }

        let mut end = i + 1;
        loop {
            if end < tokens.len() && is_proper(end) && same_line(text, &tokens[end - 1], &tokens[end]) {
                end += 1;
            } else if end + 1 < tokens.len()
                && is_connector(end)
                && is_proper(end + 1)
                && same_line(text, &tokens[end - 1], &tokens[end])
                && same_line(text, &tokens[end], &tokens[end + 1])
            {
                end += 2;
            } else {
                break;
            }
        }

        let has_suffix = tokens[i..end]
            .iter()
            .any(|t| ORGANIZATION_SUFFIXES.contains(&t.text.to_lowercase().as_str()));
        if has_suffix {
            runs.push((i, end));
        }
        i = end;
    }
    runs
}

/// Token index ranges of 2–3 name-shaped words on one line, outside the stoplist.
fn person_runs(text: &str, tokens: &[Token]) -> Vec<(usize, usize)> {
    let is_candidate = |t: &Token| {
        t.pos == PartOfSpeech::ProperNoun && is_name_like(&t.text) && !is_stoplisted(&t.text)
    };

    let mut runs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !is_candidate(&tokens[i]) {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < tokens.len()
            && is_candidate(&tokens[end])
            && spaced_on_same_line(text, &tokens[end - 1], &tokens[end])
        {
            end += 1;
        }
        if (2..=3).contains(&(end - i)) {
            runs.push((i, end));
        }
        i = end;
    }
    runs
}

/// Base noun phrases: `(DET|ADJ)* (NOUN|PROPN)+` on a single line.
fn noun_chunks(text: &str, tokens: &[Token]) -> Vec<NounChunk> {
    let is_modifier = |t: &Token| matches!(t.pos, PartOfSpeech::Determiner | PartOfSpeech::Adjective);
    let is_nominal = |t: &Token| matches!(t.pos, PartOfSpeech::Noun | PartOfSpeech::ProperNoun);
    let continues = |from: usize, j: usize| j == from || same_line(text, &tokens[j - 1], &tokens[j]);

    let mut chunks = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let mut j = i;
        while j < tokens.len() && is_modifier(&tokens[j]) && continues(i, j) {
            j += 1;
        }
        let head = j;
        while j < tokens.len() && is_nominal(&tokens[j]) && continues(i, j) {
            j += 1;
        }

        if j > head {
            let (start, end) = (tokens[i].start, tokens[j - 1].end);
            chunks.push(NounChunk {
                text: text[start..end].to_string(),
                start,
                end,
            });
            i = j;
        } else {
            i += 1;
        }
    }
    chunks
}

// ── Tests ──
