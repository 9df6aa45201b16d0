//! Optional per-stage metrics observer.
//!
//! Nothing is timed unless a recorder is installed with
//! [`set_pipeline_metrics`].

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use transformers::{TransformError, TransformerKind};

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    /// Called once per stage run by [`Compose`](crate::Compose), after the
    /// stage finished or failed.
    fn record_stage(
        &self,
        step: &str,
        kind: TransformerKind,
        latency: Duration,
        result: Result<(), &TransformError>,
    );
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_stage(
        self,
        step: &str,
        kind: TransformerKind,
        result: Result<(), &TransformError>,
    ) {
        self.recorder
            .record_stage(step, kind, self.start.elapsed(), result);
    }
}
