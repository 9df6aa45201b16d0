use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;

/// A single token produced by a tokenizer stage.
///
/// `original` is fixed at construction. Every later stage reads and writes
/// `cleaned`, which starts out unset and is defaulted from `original` the
/// first time a token-level stage touches it (see [`Token::ensure_cleaned`]).
/// The annotation fields stay `None` unless a stage that produces them ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    original: String,
    /// Working value for token-level stages.
    pub cleaned: Option<String>,
    pub lemma: Option<String>,
    pub stem: Option<String>,
    pub ner: Option<String>,
    /// Set only by an embedding stage.
    pub embedded: Option<Embedding>,
}

impl Token {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            cleaned: None,
            lemma: None,
            stem: None,
            ner: None,
            embedded: None,
        }
    }

    /// Builder used mostly by tests to describe an expected token.
    pub fn with_cleaned(mut self, cleaned: impl Into<String>) -> Self {
        self.cleaned = Some(cleaned.into());
        self
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// The cleaned text so far, falling back to `original` when no stage has
    /// touched this token yet.
    pub fn cleaned_text(&self) -> &str {
        self.cleaned.as_deref().unwrap_or(&self.original)
    }

    /// Defaults `cleaned` from `original` if unset and returns it for mutation.
    pub fn ensure_cleaned(&mut self) -> &mut String {
        let original = &self.original;
        self.cleaned.get_or_insert_with(|| original.clone())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.cleaned_text()
    }
}
