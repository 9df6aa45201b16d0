use thiserror::Error;

/// Errors raised while building document-level values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("invalid embedding: {0}")]
    InvalidEmbedding(String),
}
