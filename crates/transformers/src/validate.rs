//! Stage-type validation.
//!
//! Which categories may run is decided from the document's shape alone:
//!
//! | State     | Cleaner | Tokenizer | Normalizer | Embedding |
//! |-----------|---------|-----------|------------|-----------|
//! | Raw       | ok      | ok        | NoTokens   | NoTokens  |
//! | Tokenized | HasTokens | HasTokens | ok       | ok        |
//! | Embedded  | HasTokens | HasTokens | AlreadyEmbedded | AlreadyEmbedded |
//!
//! [`check_stage`] never mutates. [`prepare_document`] runs the same check
//! and only then applies the shared lazy default of token `cleaned` values.

use document::{Document, DocumentState};

use crate::error::StateError;
use crate::kind::TransformerKind;

/// Rejects `kind` if it cannot run on a document in `state`.
pub fn check_state(kind: TransformerKind, state: DocumentState) -> Result<(), StateError> {
    match (kind, state) {
        (TransformerKind::Cleaner | TransformerKind::Tokenizer, DocumentState::Raw) => Ok(()),
        (TransformerKind::Cleaner | TransformerKind::Tokenizer, _) => {
            Err(StateError::HasTokens(kind))
        }
        (TransformerKind::Normalizer | TransformerKind::Embedding, DocumentState::Raw) => {
            Err(StateError::NoTokens(kind))
        }
        (TransformerKind::Normalizer | TransformerKind::Embedding, DocumentState::Tokenized) => {
            Ok(())
        }
        (TransformerKind::Normalizer | TransformerKind::Embedding, DocumentState::Embedded) => {
            Err(StateError::AlreadyEmbedded(kind))
        }
    }
}

pub fn check_stage(kind: TransformerKind, doc: &Document) -> Result<(), StateError> {
    check_state(kind, doc.state())
}

/// Validates and then readies `doc` for a stage of `kind`.
pub fn prepare_document(kind: TransformerKind, doc: &mut Document) -> Result<(), StateError> {
    check_stage(kind, doc)?;
    if kind.is_token_level() {
        doc.ensure_tokens_cleaned();
    }
    Ok(())
}
