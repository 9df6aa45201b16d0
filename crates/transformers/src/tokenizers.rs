//! Tokenizers move a document from RAW to TOKENIZED.

use document::{Document, Token};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::TransformError;
use crate::kind::TransformerKind;
use crate::params::Params;
use crate::transformer::{FromParams, Transformer};

/// Splits on Unicode whitespace.
#[derive(Debug, Clone, Default)]
pub struct BasicTokenizer {
    params: Params,
}

impl BasicTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn whitespace_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token::new(&text[s..idx]));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        tokens.push(Token::new(&text[s..]));
    }

    tokens
}

impl FromParams for BasicTokenizer {
    const NAME: &'static str = "BasicTokenizer";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for BasicTokenizer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Tokenizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.tokens = Some(whitespace_tokens(&doc.cleaned));
        Ok(())
    }
}

/// Splits on UAX #29 word boundaries, so punctuation ends up in its own
/// tokens. Whitespace-only segments are dropped.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    params: Params,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for WordTokenizer {
    const NAME: &'static str = "WordTokenizer";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for WordTokenizer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Tokenizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        let tokens = doc
            .cleaned
            .split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .map(Token::new)
            .collect();
        doc.tokens = Some(tokens);
        Ok(())
    }
}
