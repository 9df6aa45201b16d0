//! The pipeline orchestrator.
//!
//! [`Compose`] runs its stages strictly in order. Copy application clones the
//! incoming document once, up front, and runs every stage in place on that
//! clone. The first failing stage aborts the run and its error is returned
//! unchanged; nothing is undone automatically.
//!
//! Reconstruction ([`Compose::from_steps`]) and rollback
//! ([`Compose::rollback_document`]) rebuild stages from the identity strings
//! recorded in `Document::steps`, through a [`Registry`].

use std::fmt;

use document::Document;
use tracing::{Level, info, span};
use transformers::{Registry, TransformError, Transformer};

use crate::metrics::MetricsSpan;

/// An ordered list of pipeline stages.
#[derive(Debug, Default)]
pub struct Compose {
    stages: Vec<Box<dyn Transformer>>,
}

impl Compose {
    pub fn new(stages: Vec<Box<dyn Transformer>>) -> Self {
        Self { stages }
    }

    pub fn transformers(&self) -> &[Box<dyn Transformer>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Appends a stage to the end of the pipeline.
    pub fn push(&mut self, stage: Box<dyn Transformer>) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// `Compose([a(), b()])`.
    pub fn identity(&self) -> String {
        let inner = self
            .stages
            .iter()
            .map(|stage| stage.identity())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Compose([{inner}])")
    }

    /// Runs every stage on a deep copy of `doc` and returns the copy.
    ///
    /// `doc` is never touched, even when a stage fails part way.
    pub fn apply(&self, doc: &Document) -> Result<Document, TransformError> {
        let mut copy = doc.clone();
        self.run(&mut copy, false)?;
        Ok(copy)
    }

    /// Runs every stage directly on `doc`.
    ///
    /// On failure, stages before the failing one have already been applied
    /// and stay applied.
    pub fn apply_in_place(&self, doc: &mut Document) -> Result<(), TransformError> {
        self.run(doc, true)
    }

    /// Runs the pipeline on a fresh document built from `text`.
    pub fn apply_text(&self, text: &str) -> Result<Document, TransformError> {
        let mut doc = Document::new(text);
        self.run(&mut doc, true)?;
        Ok(doc)
    }

    fn run(&self, doc: &mut Document, inplace: bool) -> Result<(), TransformError> {
        let span = span!(Level::INFO, "nlpiper.compose", stages = self.stages.len(), inplace);
        let _guard = span.enter();

        for stage in &self.stages {
            let metrics = MetricsSpan::start();
            let result = stage.apply_in_place(doc);
            if let Some(metrics) = metrics {
                metrics.record_stage(&stage.identity(), stage.kind(), result.as_ref().copied());
            }
            result?;
        }
        Ok(())
    }

    /// Rebuilds a pipeline from recorded step strings using the built-in
    /// transformers.
    pub fn from_steps<S: AsRef<str>>(steps: &[S]) -> Result<Self, TransformError> {
        Self::from_steps_with(Registry::global(), steps)
    }

    /// Rebuilds a pipeline from recorded step strings using `registry`.
    ///
    /// An unknown name fails with
    /// [`TransformError::UnknownTransformer`], naming the failing index and
    /// the whole step list.
    pub fn from_steps_with<S: AsRef<str>>(
        registry: &Registry,
        steps: &[S],
    ) -> Result<Self, TransformError> {
        Ok(Self::new(registry.build_all(steps)?))
    }

    /// Returns `doc` as it was before its last `num_steps` stages.
    ///
    /// The kept prefix of `doc.steps()` is rebuilt with
    /// [`from_steps`](Self::from_steps) and replayed on a fresh document made
    /// from `doc.original()`. `doc` itself is never modified.
    ///
    /// Fails with a value error when `doc` has no steps or `num_steps` is
    /// outside `1..=doc.steps().len()`.
    pub fn rollback_document(doc: &Document, num_steps: isize) -> Result<Document, TransformError> {
        Self::rollback_document_with(Registry::global(), doc, num_steps)
    }

    /// [`rollback_document`](Self::rollback_document) against a caller registry,
    /// for documents built with custom transformers.
    pub fn rollback_document_with(
        registry: &Registry,
        doc: &Document,
        num_steps: isize,
    ) -> Result<Document, TransformError> {
        let steps = doc.steps();
        if steps.is_empty() {
            return Err(TransformError::Value("no steps to rollback".to_string()));
        }
        let remove = usize::try_from(num_steps)
            .ok()
            .filter(|n| (1..=steps.len()).contains(n))
            .ok_or_else(|| {
                TransformError::Value(format!(
                    "num_steps must be between 1 and {}, got {num_steps}",
                    steps.len()
                ))
            })?;

        let keep = &steps[..steps.len() - remove];
        let pipeline = Self::from_steps_with(registry, keep)?;
        info!(
            kept = keep.len(),
            removed = remove,
            "rollback_document"
        );
        pipeline.apply(&Document::new(doc.original()))
    }
}

impl fmt::Display for Compose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

impl From<Vec<Box<dyn Transformer>>> for Compose {
    fn from(stages: Vec<Box<dyn Transformer>>) -> Self {
        Self::new(stages)
    }
}
