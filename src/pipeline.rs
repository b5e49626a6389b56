use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use fusion::{FusionError, FusionParams, HybridSearch, ResultSet};
use query::Query;
use semantic::{Embedding, EmbeddingClient, SemanticError};

use crate::metrics::MetricsSpan;
use crate::{PipelineConfig, PipelineError};

/// A successful search: the validated query and the store's results, untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub query: Query,
    pub results: ResultSet,
}

/// Validate, embed, fuse.
///
/// Holds the process-scoped embedding client and store handle. Cheap to share
/// behind an `Arc`; every call is independent of every other.
pub struct HybridSearchPipeline {
    embeddings: EmbeddingClient,
    store: Arc<dyn HybridSearch>,
    cfg: PipelineConfig,
}

/// Map validated query tunables onto the store's parameters.
pub fn fusion_params(query: &Query) -> FusionParams {
    FusionParams {
        match_count: query.match_count,
        full_text_weight: query.full_text_weight,
        semantic_weight: query.semantic_weight,
        rrf_k: query.rrf_k,
    }
}

impl HybridSearchPipeline {
    pub fn new(
        embeddings: EmbeddingClient,
        store: Arc<dyn HybridSearch>,
        cfg: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        cfg.validate()?;
        Ok(Self {
            embeddings,
            store,
            cfg,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    pub fn dimension(&self) -> usize {
        self.embeddings.dimension()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Run one raw request body through the whole pipeline.
    ///
    /// Validation happens before anything leaves the process; an invalid body
    /// never costs an embedding call.
    pub async fn handle(&self, raw: &Value) -> Result<SearchOutcome, PipelineError> {
        let query = match query::normalize(raw, &self.cfg.query) {
            Ok(query) => query,
            Err(err) => {
                tracing::warn!(error = %err, "rejected search request");
                let err = PipelineError::from(err);
                if let Some(span) = MetricsSpan::start() {
                    span.record_request(Err(err.clone()));
                }
                return Err(err);
            }
        };
        self.search(query).await
    }

    /// Search with an already-built [`Query`]. The query is re-validated.
    pub async fn search(&self, query: Query) -> Result<SearchOutcome, PipelineError> {
        let request_metrics = MetricsSpan::start();
        let started = Instant::now();

        let result = match query.validate(&self.cfg.query) {
            Ok(()) => self.run(&query).await,
            Err(err) => Err(PipelineError::from(err)),
        };

        match &result {
            Ok(results) => tracing::info!(
                query = %query.text,
                match_count = query.match_count,
                full_text_weight = query.full_text_weight,
                semantic_weight = query.semantic_weight,
                rrf_k = query.rrf_k,
                results = results.len(),
                first_id = ?results.first().and_then(|r| r.id()),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "hybrid search completed"
            ),
            Err(err) if err.is_client_error() => {
                tracing::warn!(query = %query.text, error = %err, "rejected search request")
            }
            Err(err) => tracing::error!(
                query = %query.text,
                match_count = query.match_count,
                full_text_weight = query.full_text_weight,
                semantic_weight = query.semantic_weight,
                rrf_k = query.rrf_k,
                kind = err.kind(),
                error = %err,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "hybrid search failed"
            ),
        }
        if let Some(span) = request_metrics {
            span.record_request(result.as_ref().map(Vec::len).map_err(Clone::clone));
        }

        result.map(|results| SearchOutcome { query, results })
    }

    /// Release the store's pooled resources.
    pub async fn close(&self) {
        self.store.close().await;
        tracing::info!(backend = self.store.backend_name(), "store closed");
    }

    async fn run(&self, query: &Query) -> Result<ResultSet, PipelineError> {
        let embedding = self.embed(&query.text).await?;
        let params = fusion_params(query);
        Ok(self.fuse(&query.text, &embedding, &params).await?)
    }

    async fn embed(&self, text: &str) -> Result<Embedding, SemanticError> {
        let span = MetricsSpan::start();
        let started = Instant::now();
        let result = match tokio::time::timeout(self.cfg.embed_timeout(), self.embeddings.embed(text)).await {
            Ok(result) => result,
            Err(_) => Err(SemanticError::Timeout),
        };
        tracing::debug!(
            model = self.embeddings.model(),
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedding stage"
        );
        if let Some(span) = span {
            span.record_embed(result.as_ref().map(|_| ()).map_err(Clone::clone));
        }
        result
    }

    async fn fuse(
        &self,
        text: &str,
        embedding: &Embedding,
        params: &FusionParams,
    ) -> Result<ResultSet, FusionError> {
        let span = MetricsSpan::start();
        let started = Instant::now();
        let result = match tokio::time::timeout(
            self.cfg.store_timeout(),
            self.store.fuse(text, embedding.as_slice(), params),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FusionError::Timeout),
        };
        tracing::debug!(
            backend = self.store.backend_name(),
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fusion stage"
        );
        if let Some(span) = span {
            span.record_fuse(result.as_ref().map(Vec::len).map_err(Clone::clone));
        }
        result
    }
}
