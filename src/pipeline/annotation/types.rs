use serde::{Deserialize, Serialize};

/// Coarse part-of-speech tag (Universal Dependencies style).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Auxiliary,
    Numeral,
    Punctuation,
    Symbol,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Organization,
}

/// A token with its byte span in the annotated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
    pub start: usize,
    pub end: usize,
}

/// A named-entity span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// A base noun phrase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NounChunk {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Text plus the linguistic structure derived from it.
/// Tokens, entities and chunks are all in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotatedText {
    pub text: String,
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
    pub noun_chunks: Vec<NounChunk>,
}

impl AnnotatedText {
    pub fn entities_with_label(&self, label: EntityLabel) -> impl Iterator<Item = &EntitySpan> {
        self.entities.iter().filter(move |e| e.label == label)
    }

    pub fn tokens_with_pos(&self, pos: PartOfSpeech) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |t| t.pos == pos)
    }
}
