use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::time::{Duration, Instant};

use fusion::FusionError;
use semantic::SemanticError;

use crate::PipelineError;

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_embed(&self, latency: Duration, result: Result<(), SemanticError>);
    fn record_fuse(&self, latency: Duration, result: Result<usize, FusionError>);
    fn record_request(&self, latency: Duration, result: Result<usize, PipelineError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    guard.clone()
}

/// Times one stage and hands the outcome to the installed recorder, if any.
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

    pub(crate) fn record_embed(self, result: Result<(), SemanticError>) {
        self.recorder.record_embed(self.start.elapsed(), result);
    }

    pub(crate) fn record_fuse(self, result: Result<usize, FusionError>) {
        self.recorder.record_fuse(self.start.elapsed(), result);
    }

    pub(crate) fn record_request(self, result: Result<usize, PipelineError>) {
        self.recorder.record_request(self.start.elapsed(), result);
    }
}
