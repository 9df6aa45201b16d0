use std::fmt;

use serde::{Deserialize, Serialize};

/// The four stage categories. The validator dispatches on this tag, never on
/// the concrete transformer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformerKind {
    Cleaner,
    Tokenizer,
    Normalizer,
    Embedding,
}

impl TransformerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformerKind::Cleaner => "Cleaner",
            TransformerKind::Tokenizer => "Tokenizer",
            TransformerKind::Normalizer => "Normalizer",
            TransformerKind::Embedding => "Embedding",
        }
    }

    /// Whether this category works on individual tokens rather than the
    /// whole document text.
    pub fn is_token_level(&self) -> bool {
        matches!(self, TransformerKind::Normalizer | TransformerKind::Embedding)
    }
}

impl fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
