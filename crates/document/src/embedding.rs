//! Fixed-width numeric vectors attached to tokens and documents.
//!
//! An [`Embedding`] is always non-empty and holds only finite `f32` values.
//! The check runs at construction and on deserialization, so a value of this
//! type is valid wherever it shows up.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// A dense `f32` vector produced by an embedding stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Wraps `values`, rejecting empty vectors and NaN/infinite entries.
    pub fn new(values: Vec<f32>) -> Result<Self, DocumentError> {
        if values.is_empty() {
            return Err(DocumentError::InvalidEmbedding(
                "embedding must have at least one dimension".into(),
            ));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(DocumentError::InvalidEmbedding(format!(
                "value at index {idx} is not finite"
            )));
        }
        Ok(Self(values))
    }

    /// A zero vector of width `dim`.
    pub fn zeros(dim: usize) -> Result<Self, DocumentError> {
        Self::new(vec![0.0; dim])
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl TryFrom<Vec<f32>> for Embedding {
    type Error = DocumentError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(value: Embedding) -> Self {
        value.0
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}
