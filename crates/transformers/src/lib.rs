//! nlpiper pipeline stages.
//!
//! A stage is anything implementing [`Transformer`]. It belongs to one of
//! four categories ([`TransformerKind`]) and the category alone decides
//! whether it may run on a document:
//!
//! - Cleaners rewrite `Document::cleaned` and only run before tokenization.
//! - Tokenizers turn `cleaned` into tokens, once.
//! - Normalizers rewrite `Token::cleaned` (or fill `Token::stem`) on
//!   tokenized documents.
//! - Embeddings attach vectors and end the pipeline.
//!
//! ## Purity
//!
//! Every built-in is a pure function of the incoming document and its own
//! constructor arguments. Its [`identity`](Transformer::identity) string is
//! a literal constructor call that [`Registry::build`] turns back into an
//! equivalent transformer, which is what makes replay and rollback work.
//!
//! ## Step strings
//!
//! Steps are parsed with a small literal-only grammar ([`parse_step`]) and
//! resolved through a [`Registry`]. There is no evaluation of arbitrary code.

mod cleaners;
mod embeddings;
mod error;
mod kind;
mod normalizers;
mod params;
mod registry;
mod step;
mod tokenizers;
mod transformer;
mod validate;

pub use crate::cleaners::{
    AccentMode, CleanAccents, CleanEmail, CleanMarkup, CleanNumber, CleanPunctuation, CleanURL,
    CleanWhitespace,
};
pub use crate::embeddings::{
    DocPooling, HashEmbeddings, VectorFileError, WordEmbeddings, WordVectors,
};
pub use crate::error::{ErrorKind, StateError, TransformError};
pub use crate::kind::TransformerKind;
pub use crate::normalizers::{
    CaseMode, CaseTokens, NormalizeUnicode, RemovePunctuation, RemoveStopWords, StemLanguage,
    StemTokens, UnicodeForm,
};
pub use crate::params::{BoundArgs, Params, Value};
pub use crate::registry::{Factory, Registry};
pub use crate::step::{parse_step, ParsedStep};
pub use crate::tokenizers::{BasicTokenizer, WordTokenizer};
pub use crate::transformer::{FromParams, Transformer};
pub use crate::validate::{check_stage, check_state};

pub use document::{Document, DocumentState, Embedding, Token};
