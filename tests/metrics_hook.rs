//! The recorder is process-global, so this lives in its own test binary.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{MockEmbedder, MockStore, pipeline};
use fusion::FusionError;
use hybrid_search::{PipelineConfig, PipelineError, PipelineMetrics, set_pipeline_metrics};
use semantic::SemanticError;
use serde_json::json;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl PipelineMetrics for Recorder {
    fn record_embed(&self, _latency: Duration, result: Result<(), SemanticError>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("embed:{}", result.is_ok()));
    }

    fn record_fuse(&self, _latency: Duration, result: Result<usize, FusionError>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("fuse:{}", result.map(|n| n.to_string()).unwrap_or_default()));
    }

    fn record_request(&self, _latency: Duration, result: Result<usize, PipelineError>) {
        let label = match result {
            Ok(n) => n.to_string(),
            Err(err) => err.kind().to_string(),
        };
        self.events.lock().unwrap().push(format!("request:{label}"));
    }
}

#[tokio::test]
async fn recorder_sees_every_stage() {
    let recorder = Arc::new(Recorder::default());
    set_pipeline_metrics(Some(recorder.clone()));

    let pipeline = pipeline(
        Arc::new(MockEmbedder::default()),
        Arc::new(MockStore::with_rows()),
        PipelineConfig::default(),
    );
    pipeline.handle(&json!({ "query": "red shoes" })).await.unwrap();
    pipeline.handle(&json!({})).await.unwrap_err();

    set_pipeline_metrics(None);
    pipeline.handle(&json!({ "query": "after clear" })).await.unwrap();

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "embed:true".to_string(),
            "fuse:3".to_string(),
            "request:3".to_string(),
            "request:invalid_argument".to_string(),
        ]
    );
}
