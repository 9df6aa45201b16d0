//! nlpiper document model.
//!
//! State containers shared by every pipeline stage:
//!
//! - [`Document`] holds the source text, the working text, tokens, an
//!   optional document embedding and the ordered log of applied steps.
//! - [`Token`] holds a token's source text plus the working `cleaned` value
//!   and optional annotations.
//! - [`Embedding`] is a validated, non-empty `f32` vector.
//!
//! Nothing here knows about stages. The rules about which stage may run on
//! which [`DocumentState`] live in the `transformers` crate.

mod document;
mod embedding;
mod error;
mod token;

pub use crate::document::{Document, DocumentState};
pub use crate::embedding::Embedding;
pub use crate::error::DocumentError;
pub use crate::token::Token;
