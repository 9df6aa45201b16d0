//! Error types produced by transformers, the step parser and the registry.
//!
//! Every failure falls into one [`ErrorKind`] so callers can decide whether
//! to retry with different input or give up:
//!
//! | Error | Kind | Raised when |
//! |-------|------|-------------|
//! | [`State`](TransformError::State) | State | stage category does not fit the document shape |
//! | [`Value`](TransformError::Value) | Value | bad rollback range or bad constructor argument |
//! | [`InvalidStep`](TransformError::InvalidStep) | Value | a step string does not parse |
//! | [`Document`](TransformError::Document) | Value | a produced value broke a document invariant |
//! | [`Type`](TransformError::Type) | Type | a constructor argument has the wrong type |
//! | [`UnknownTransformer`](TransformError::UnknownTransformer) | NameResolution | a step names an unregistered transformer |
//! | [`Collaborator`](TransformError::Collaborator) | Collaborator | a leaf reported its own failure |

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use document::DocumentError;
use thiserror::Error;

use crate::kind::TransformerKind;

/// Broad classification of a [`TransformError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Type,
    State,
    Value,
    NameResolution,
    Collaborator,
}

/// A stage category was rejected by the document's current shape.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("{0} transformer can not be applied on documents with tokens")]
    HasTokens(TransformerKind),
    #[error("{0} transformer can not be applied on documents without tokens")]
    NoTokens(TransformerKind),
    #[error("{0} transformer can not be applied on documents with embeddings")]
    AlreadyEmbedded(TransformerKind),
}

#[derive(Debug, Error, Clone)]
pub enum TransformError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("invalid value: {0}")]
    Value(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("invalid type: {0}")]
    Type(String),
    #[error("invalid step {index} `{step}`: {reason}")]
    InvalidStep {
        step: String,
        index: usize,
        reason: String,
    },
    #[error("unknown transformer `{name}` at step {index} of {steps:?}")]
    UnknownTransformer {
        name: String,
        index: usize,
        steps: Vec<String>,
    },
    #[error("{transformer} failed: {source}")]
    Collaborator {
        transformer: String,
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::State(_) => ErrorKind::State,
            TransformError::Value(_)
            | TransformError::Document(_)
            | TransformError::InvalidStep { .. } => ErrorKind::Value,
            TransformError::Type(_) => ErrorKind::Type,
            TransformError::UnknownTransformer { .. } => ErrorKind::NameResolution,
            TransformError::Collaborator { .. } => ErrorKind::Collaborator,
        }
    }

    /// Wraps a leaf's own error without interpreting it.
    pub fn collaborator(
        transformer: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        TransformError::Collaborator {
            transformer: transformer.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn invalid_step(step: &str, reason: impl fmt::Display) -> Self {
        TransformError::InvalidStep {
            step: step.to_string(),
            index: 0,
            reason: reason.to_string(),
        }
    }

    /// Places a parse or constructor failure at `index` of a step list.
    pub fn at_step(self, index: usize, step: &str) -> Self {
        match self {
            TransformError::InvalidStep { step, reason, .. } => TransformError::InvalidStep {
                step,
                index,
                reason,
            },
            TransformError::Type(msg) => TransformError::Type(format!("step {index} `{step}`: {msg}")),
            TransformError::Value(msg) => {
                TransformError::Value(format!("step {index} `{step}`: {msg}"))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn state_error_names_the_category() {
        let err = TransformError::from(StateError::HasTokens(TransformerKind::Cleaner));
        assert_eq!(
            err.to_string(),
            "Cleaner transformer can not be applied on documents with tokens"
        );
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn unknown_transformer_lists_all_steps() {
        let err = TransformError::UnknownTransformer {
            name: "NotTransformer".into(),
            index: 1,
            steps: vec!["BasicTokenizer()".into(), "NotTransformer()".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("NotTransformer"));
        assert!(msg.contains("step 1"));
        assert!(msg.contains("BasicTokenizer()"));
        assert_eq!(err.kind(), ErrorKind::NameResolution);
    }

    #[test]
    fn collaborator_error_is_passed_through() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "vectors.txt missing");
        let err = TransformError::collaborator("WordEmbeddings", io_err);

        assert_eq!(err.kind(), ErrorKind::Collaborator);
        let source = err.source().expect("source kept");
        assert_eq!(source.to_string(), "vectors.txt missing");
        match &err {
            TransformError::Collaborator { source, .. } => {
                assert!(source.downcast_ref::<io::Error>().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn value_family_covers_invalid_steps() {
        let err = TransformError::invalid_step("CaseTokens(", "unexpected end of input");
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("CaseTokens("));
    }

    #[test]
    fn at_step_keeps_kind_and_adds_position() {
        let err = TransformError::invalid_step("X(", "eof").at_step(3, "X(");
        assert!(matches!(err, TransformError::InvalidStep { index: 3, .. }));

        let err = TransformError::Type("bad mode".into()).at_step(2, "CaseTokens(mode=1)");
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.to_string(), "invalid type: step 2 `CaseTokens(mode=1)`: bad mode");

        let err = TransformError::from(StateError::NoTokens(TransformerKind::Embedding)).at_step(1, "x");
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
