//! nlpiper: composable, replayable NLP preprocessing pipelines.
//!
//! A [`Document`] moves through typed stages (cleaners, tokenizers,
//! normalizers, embeddings) wrapped in a [`Compose`]. Every stage appends its
//! constructor-call identity to the document's step log, so the exact
//! pipeline can be rebuilt later with [`Compose::from_steps`] or a document
//! can be rolled back with [`Compose::rollback_document`].
//!
//! ```no_run
//! use nlpiper::{BasicTokenizer, CaseTokens, CleanNumber, Compose, Document};
//!
//! let pipeline = Compose::new(vec![
//!     Box::new(CleanNumber::new()),
//!     Box::new(BasicTokenizer::new()),
//!     Box::new(CaseTokens::default()),
//! ]);
//! let doc = pipeline.apply(&Document::new("Test 123 document."))?;
//! assert_eq!(doc.token_texts(), vec!["test", "document."]);
//!
//! let rebuilt = Compose::from_steps(doc.steps())?;
//! assert_eq!(rebuilt.identity(), pipeline.identity());
//! # Ok::<(), nlpiper::TransformError>(())
//! ```

mod compose;
mod config;
mod logging;
mod metrics;

pub use crate::compose::Compose;
pub use crate::config::{ConfigLoadError, PipelineConfig};
pub use crate::logging::{LoggingConfig, LoggingError, init_tracing};
pub use crate::metrics::{PipelineMetrics, set_pipeline_metrics};

pub use document::{Document, DocumentError, DocumentState, Embedding, Token};
pub use transformers::{
    AccentMode, BasicTokenizer, CaseMode, CaseTokens, CleanAccents, CleanEmail, CleanMarkup,
    CleanNumber, CleanPunctuation, CleanURL, CleanWhitespace, DocPooling, ErrorKind, Factory,
    FromParams, HashEmbeddings, NormalizeUnicode, Params, ParsedStep, Registry, RemovePunctuation,
    RemoveStopWords, StateError, StemLanguage, StemTokens, TransformError, Transformer,
    TransformerKind, UnicodeForm, Value, VectorFileError, WordEmbeddings, WordTokenizer,
    WordVectors, check_stage, check_state, parse_step,
};
