//! Prometheus export for pipeline stages and HTTP traffic.

use fusion::FusionError;
use hybrid_search::{set_pipeline_metrics, PipelineError, PipelineMetrics};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use semantic::SemanticError;
use std::sync::Arc;
use std::time::Duration;

/// Forwards pipeline observations to the global `metrics` recorder.
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_embed(&self, latency: Duration, result: Result<(), SemanticError>) {
        let outcome = match &result {
            Ok(()) => "ok",
            Err(SemanticError::Timeout) => "timeout",
            Err(SemanticError::DimensionMismatch { .. }) => "dimension_mismatch",
            Err(_) => "error",
        };
        counter!("hybrid_search_embed_total", "outcome" => outcome).increment(1);
        histogram!("hybrid_search_embed_seconds").record(latency.as_secs_f64());
    }

    fn record_fuse(&self, latency: Duration, result: Result<usize, FusionError>) {
        let outcome = match &result {
            Ok(_) => "ok",
            Err(FusionError::Timeout) => "timeout",
            Err(_) => "error",
        };
        counter!("hybrid_search_fuse_total", "outcome" => outcome).increment(1);
        histogram!("hybrid_search_fuse_seconds").record(latency.as_secs_f64());
        if let Ok(rows) = result {
            histogram!("hybrid_search_results").record(rows as f64);
        }
    }

    fn record_request(&self, latency: Duration, result: Result<usize, PipelineError>) {
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => err.kind(),
        };
        counter!("hybrid_search_requests_total", "outcome" => outcome).increment(1);
        histogram!("hybrid_search_request_seconds").record(latency.as_secs_f64());
    }
}

/// Install the Prometheus recorder and hook the pipeline into it.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    set_pipeline_metrics(Some(Arc::new(PrometheusPipelineMetrics)));
    Ok(handle)
}

/// Count one HTTP exchange.
pub fn record_http(method: &str, route: &str, status: u16, latency: Duration) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "route" => route.to_string())
        .record(latency.as_secs_f64());
}
