//! The mutable document record that flows through a pipeline.
//!
//! A [`Document`] is created once from raw text and then mutated by stages,
//! either in place or on a deep copy. Its shape determines which stage
//! categories may still run:
//!
//! ```text
//! Document
//! ├── original: String              # source text, never mutated
//! ├── cleaned: String               # working buffer for cleaner stages
//! ├── tokens: Option<Vec<Token>>    # None until a tokenizer runs
//! ├── embedded: Option<Embedding>   # None until an embedding stage runs
//! └── steps: Vec<String>            # identities of applied stages, in order
//! ```
//!
//! # Examples
//!
//! ```rust
//! use document::{Document, DocumentState};
//!
//! let doc = Document::new("Hello world");
//! assert_eq!(doc.original(), "Hello world");
//! assert_eq!(doc.cleaned, "Hello world");
//! assert_eq!(doc.state(), DocumentState::Raw);
//! assert!(doc.steps().is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::token::Token;

/// Shape of a document, inferred from which optional fields are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentState {
    /// No tokens yet.
    Raw,
    /// Tokens present, no embedding.
    Tokenized,
    /// Tokens and a document embedding present.
    Embedded,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentState::Raw => "raw",
            DocumentState::Tokenized => "tokenized",
            DocumentState::Embedded => "embedded",
        };
        f.write_str(label)
    }
}

/// A text document plus everything the pipeline has derived from it.
///
/// `Clone` is a full deep copy: tokens and embeddings are owned values, so a
/// clone never shares state with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    original: String,
    /// Working text. Cleaner stages rewrite it, tokenizers read it.
    pub cleaned: String,
    pub tokens: Option<Vec<Token>>,
    /// Document-level embedding aggregated from token embeddings.
    pub embedded: Option<Embedding>,
    steps: Vec<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let original: String = text.into();
        Self {
            cleaned: original.clone(),
            original,
            tokens: None,
            embedded: None,
            steps: Vec::new(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Identities of every stage applied so far, oldest first.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Appends a stage identity to the provenance log.
    ///
    /// The log is append-only; the only way to shorten it is to rebuild the
    /// document from its steps.
    pub fn record_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn state(&self) -> DocumentState {
        match (&self.tokens, &self.embedded) {
            (None, _) => DocumentState::Raw,
            (Some(_), None) => DocumentState::Tokenized,
            (Some(_), Some(_)) => DocumentState::Embedded,
        }
    }

    pub fn has_tokens(&self) -> bool {
        self.tokens.is_some()
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded.is_some()
    }

    /// Cleaned text of every token, or an empty list when not tokenized.
    pub fn token_texts(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .flatten()
            .map(Token::cleaned_text)
            .collect()
    }

    /// Defaults every token's `cleaned` field from its `original`.
    pub fn ensure_tokens_cleaned(&mut self) {
        for token in self.tokens.iter_mut().flatten() {
            token.ensure_cleaned();
        }
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::new(value)
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::new(value)
    }
}
