//! Embedding stages: the terminal TOKENIZED → EMBEDDED step.
//!
//! Every token gets a vector in `Token::embedded`, and the document vector is
//! pooled from them. A tokenized document with no tokens still becomes
//! EMBEDDED, with a zero vector of the configured width.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use document::{Document, Embedding};
use fxhash::{hash64, FxHashMap};
use thiserror::Error;
use tracing::info;

use crate::error::TransformError;
use crate::kind::TransformerKind;
use crate::params::Params;
use crate::transformer::{FromParams, Transformer};

/// How token vectors combine into the document vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocPooling {
    Mean,
    Sum,
}

impl DocPooling {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocPooling::Mean => "mean",
            DocPooling::Sum => "sum",
        }
    }

    pub fn parse(value: &str) -> Result<Self, TransformError> {
        match value {
            "mean" => Ok(DocPooling::Mean),
            "sum" => Ok(DocPooling::Sum),
            other => Err(TransformError::Value(format!(
                "{other} is not a valid apply_doc, expected \"mean\" or \"sum\""
            ))),
        }
    }
}

/// Assigns `embed(token_text)` to every token, then pools the document vector.
///
/// Pooling accumulates in `f64`. Nothing is written to `doc` until every
/// token vector and the pooled vector have validated.
fn embed_document(
    doc: &mut Document,
    dim: usize,
    pooling: DocPooling,
    mut embed: impl FnMut(&str) -> Vec<f32>,
) -> Result<(), TransformError> {
    let mut pooled = vec![0f64; dim];
    let mut token_vectors = Vec::new();

    for token in doc.tokens.iter().flatten() {
        let vector = embed(token.cleaned_text());
        for (acc, value) in pooled.iter_mut().zip(&vector) {
            *acc += f64::from(*value);
        }
        token_vectors.push(Embedding::new(vector)?);
    }

    if pooling == DocPooling::Mean && !token_vectors.is_empty() {
        let n = token_vectors.len() as f64;
        for value in pooled.iter_mut() {
            *value /= n;
        }
    }
    let pooled = Embedding::new(pooled.into_iter().map(|v| v as f32).collect())?;

    for (token, vector) in doc.tokens.iter_mut().flatten().zip(token_vectors) {
        token.embedded = Some(vector);
    }
    doc.embedded = Some(pooled);
    Ok(())
}

fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

/// Deterministic feature-hash embedding of each token's text.
///
/// The same text always yields the same vector, across runs and processes.
/// Values lie in `[-1, 1)`; an empty token embeds as zeros.
#[derive(Debug, Clone)]
pub struct HashEmbeddings {
    dim: usize,
    pooling: DocPooling,
    normalize: bool,
    params: Params,
}

impl HashEmbeddings {
    pub const DEFAULT_DIM: usize = 32;

    pub fn new(dim: usize, pooling: DocPooling, normalize: bool) -> Result<Self, TransformError> {
        if dim == 0 {
            return Err(TransformError::Value(
                "dim must be a positive integer".to_string(),
            ));
        }
        let params = Params::new()
            .kwarg("dim", dim as i64)
            .kwarg("apply_doc", pooling.as_str())
            .kwarg("normalize", normalize);
        Ok(Self {
            dim,
            pooling,
            normalize,
            params,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Vector for a single piece of text.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        if text.is_empty() {
            return v;
        }
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            // Top 24 bits of a rotated hash, exact in f32.
            let bits = h.rotate_left((idx % 64) as u32) >> 40;
            *value = (bits as f32 / (1u32 << 24) as f32) * 2.0 - 1.0;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

impl FromParams for HashEmbeddings {
    const NAME: &'static str = "HashEmbeddings";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["dim", "apply_doc", "normalize"])?;
        let dim = bound.int_or("dim", Self::DEFAULT_DIM as i64)?;
        let dim = usize::try_from(dim)
            .map_err(|_| TransformError::Value("dim must be a positive integer".to_string()))?;
        let pooling = DocPooling::parse(&bound.str_or("apply_doc", "mean")?)?;
        Self::new(dim, pooling, bound.bool_or("normalize", false)?)
    }
}

impl Transformer for HashEmbeddings {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Embedding
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        embed_document(doc, self.dim, self.pooling, |text| self.embed_text(text))
    }
}

/// Failure to load a word-vector file.
#[derive(Debug, Error)]
pub enum VectorFileError {
    #[error("failed to read vector file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed vector file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("vector file '{}' contains no vectors", .0.display())]
    Empty(PathBuf),
}

/// In-memory word-vector table parsed from a word2vec/GloVe text file.
#[derive(Clone, Default)]
pub struct WordVectors {
    dim: usize,
    vectors: FxHashMap<String, Vec<f32>>,
}

impl WordVectors {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VectorFileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| VectorFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text)?;
        if table.is_empty() {
            return Err(VectorFileError::Empty(path.to_path_buf()));
        }
        Ok(table)
    }

    /// Parses `word v1 v2 ...` lines. A leading `count dim` line is treated
    /// as a header and fixes the expected width.
    pub fn parse(text: &str) -> Result<Self, VectorFileError> {
        let mut table = WordVectors::default();
        let mut expected: Option<usize> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if table.vectors.is_empty() && expected.is_none() && fields.len() == 2 {
                if let (Ok(_), Ok(dim)) = (fields[0].parse::<usize>(), fields[1].parse::<usize>())
                {
                    expected = Some(dim);
                    continue;
                }
            }

            let (word, values) = (fields[0], &fields[1..]);
            if values.is_empty() {
                return Err(VectorFileError::Malformed {
                    line: line_no,
                    reason: format!("word '{word}' has no vector"),
                });
            }
            let vector = values
                .iter()
                .map(|raw| {
                    raw.parse::<f32>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| VectorFileError::Malformed {
                            line: line_no,
                            reason: format!("'{raw}' is not a finite number"),
                        })
                })
                .collect::<Result<Vec<f32>, _>>()?;

            let width = *expected.get_or_insert(vector.len());
            if vector.len() != width {
                return Err(VectorFileError::Malformed {
                    line: line_no,
                    reason: format!("expected {width} values, found {}", vector.len()),
                });
            }
            table.dim = width;
            table.vectors.insert(word.to_string(), vector);
        }

        Ok(table)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

impl fmt::Debug for WordVectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordVectors")
            .field("dim", &self.dim)
            .field("vocab", &self.vectors.len())
            .finish()
    }
}

/// Looks token text up in a pre-trained word-vector table. Unknown words
/// embed as zeros.
#[derive(Debug, Clone)]
pub struct WordEmbeddings {
    vectors: Arc<WordVectors>,
    pooling: DocPooling,
    params: Params,
}

impl WordEmbeddings {
    pub fn load(path: &str, pooling: DocPooling) -> Result<Self, TransformError> {
        let vectors = WordVectors::load(path)
            .map_err(|err| TransformError::collaborator(<Self as FromParams>::NAME, err))?;
        info!(
            path,
            vocab = vectors.len(),
            dim = vectors.dim(),
            "word_vectors_loaded"
        );
        Ok(Self::with_vectors(path, Arc::new(vectors), pooling))
    }

    /// Wraps an already loaded table; `path` is only used for the identity.
    pub fn with_vectors(path: &str, vectors: Arc<WordVectors>, pooling: DocPooling) -> Self {
        let params = Params::new()
            .kwarg("path", path)
            .kwarg("apply_doc", pooling.as_str());
        Self {
            vectors,
            pooling,
            params,
        }
    }

    pub fn dim(&self) -> usize {
        self.vectors.dim()
    }
}

impl FromParams for WordEmbeddings {
    const NAME: &'static str = "WordEmbeddings";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["path", "apply_doc"])?;
        let path = bound.required_str("path")?;
        let pooling = DocPooling::parse(&bound.str_or("apply_doc", "mean")?)?;
        Self::load(&path, pooling)
    }
}

impl Transformer for WordEmbeddings {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Embedding
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        let dim = self.vectors.dim();
        embed_document(doc, dim, self.pooling, |text| {
            self.vectors
                .get(text)
                .map(<[f32]>::to_vec)
                .unwrap_or_else(|| vec![0f32; dim])
        })
    }
}
