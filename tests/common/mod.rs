//! Mock pipeline collaborators with call counters.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fusion::{FusionError, FusionParams, HybridSearch, RankedResult, ResultSet};
use hybrid_search::{EmbeddingClient, HybridSearchPipeline, PipelineConfig};
use semantic::{Embedder, SemanticError};
use serde_json::json;

pub const DIM: usize = 4;

#[derive(Default)]
pub struct MockEmbedder {
    pub calls: AtomicUsize,
    pub vector_len: Option<usize>,
    pub fail: Option<SemanticError>,
    pub delay: Option<Duration>,
}

impl MockEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        let len = self.vector_len.unwrap_or(DIM);
        Ok((0..len).map(|i| (text.len() + i) as f32).collect())
    }

    fn model(&self) -> &str {
        "mock"
    }
}

pub struct Call {
    pub text: String,
    pub embedding: Vec<f32>,
    pub params: FusionParams,
}

#[derive(Default)]
pub struct MockStore {
    pub calls: AtomicUsize,
    pub last: Mutex<Option<Call>>,
    pub rows: ResultSet,
    pub fail: Option<FusionError>,
    pub delay: Option<Duration>,
    pub closed: AtomicUsize,
}

impl MockStore {
    /// Rows deliberately out of score order so re-sorting would be visible.
    pub fn with_rows() -> Self {
        let rows = [("b", 0.0196), ("a", 0.0384), ("c", 0.0192)]
            .into_iter()
            .map(|(id, score)| {
                RankedResult::from_value(json!({ "id": id, "content": id, "fused_score": score }))
                    .unwrap()
            })
            .collect();
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<FusionParams> {
        self.last.lock().unwrap().as_ref().map(|call| call.params)
    }
}

#[async_trait]
impl HybridSearch for MockStore {
    async fn fuse(
        &self,
        query_text: &str,
        query_embedding: &[f32],
        params: &FusionParams,
    ) -> Result<ResultSet, FusionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(Call {
            text: query_text.to_string(),
            embedding: query_embedding.to_vec(),
            params: *params,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        Ok(self.rows.clone())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn pipeline(
    embedder: Arc<MockEmbedder>,
    store: Arc<MockStore>,
    cfg: PipelineConfig,
) -> HybridSearchPipeline {
    HybridSearchPipeline::new(EmbeddingClient::new(embedder, DIM), store, cfg).unwrap()
}
