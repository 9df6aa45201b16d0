//! The capability contract every pipeline stage implements.

use std::fmt;
use std::time::Instant;

use document::Document;
use tracing::{debug, warn};

use crate::error::TransformError;
use crate::kind::TransformerKind;
use crate::params::Params;
use crate::validate::{check_stage, prepare_document};

/// A pipeline stage.
///
/// Implementors supply [`name`](Transformer::name), [`kind`](Transformer::kind),
/// [`params`](Transformer::params) and the leaf work in
/// [`transform`](Transformer::transform). The provided methods wrap that work
/// with the stage-type check, the lazy `cleaned` default and step logging, so
/// a stage never has to do any of those itself.
///
/// `transform` only ever sees a document that already passed validation.
/// Every transformer must be a pure function of the prior document state and
/// its own params; replay and rollback depend on it.
pub trait Transformer: fmt::Debug + Send + Sync {
    /// Registered name, used as the head of the identity string.
    fn name(&self) -> &'static str;

    fn kind(&self) -> TransformerKind;

    /// Canonical constructor arguments.
    fn params(&self) -> &Params;

    /// Leaf transformation on a validated document.
    fn transform(&self, doc: &mut Document) -> Result<(), TransformError>;

    /// Reproducible constructor-call rendering, e.g. `CaseTokens(mode='lower')`.
    fn identity(&self) -> String {
        self.params().render(self.name())
    }

    /// Mutates `doc` directly and records this stage in its step log.
    ///
    /// A stage-type mismatch fails before anything is touched.
    fn apply_in_place(&self, doc: &mut Document) -> Result<(), TransformError> {
        let start = Instant::now();
        if let Err(err) = prepare_document(self.kind(), doc) {
            warn!(stage = self.name(), state = %doc.state(), error = %err, "stage_rejected");
            return Err(err.into());
        }

        match self.transform(doc) {
            Ok(()) => {
                let identity = self.identity();
                debug!(
                    step = %identity,
                    elapsed_micros = start.elapsed().as_micros(),
                    "stage_applied"
                );
                doc.record_step(identity);
                Ok(())
            }
            Err(err) => {
                warn!(
                    stage = self.name(),
                    error = %err,
                    elapsed_micros = start.elapsed().as_micros(),
                    "stage_failed"
                );
                Err(err)
            }
        }
    }

    /// Runs on a deep copy of `doc` and returns it; `doc` is left untouched.
    fn apply(&self, doc: &Document) -> Result<Document, TransformError> {
        check_stage(self.kind(), doc)?;
        let mut copy = doc.clone();
        self.apply_in_place(&mut copy)?;
        Ok(copy)
    }
}

/// Construction from parsed step arguments.
pub trait FromParams: Sized {
    /// Name the transformer is registered and rendered under.
    const NAME: &'static str;

    fn from_params(params: &Params) -> Result<Self, TransformError>;
}
