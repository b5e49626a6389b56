use crate::config::ServerConfig;
use crate::telemetry;
use fusion::connect_store;
use hybrid_search::{EmbeddingClient, HybridSearchPipeline};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared server state
///
/// Holds the process-scoped pipeline (embedding client + store pool). Built
/// once on boot and shared by every request.
pub struct ServerState {
    pub config: ServerConfig,
    pub pipeline: Arc<HybridSearchPipeline>,
    pub prometheus: Option<PrometheusHandle>,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        pipeline: Arc<HybridSearchPipeline>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config,
            pipeline,
            prometheus,
        }
    }

    /// Create the embedding client, open the store and install metrics.
    pub async fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let embeddings = EmbeddingClient::from_config(&config.embedding)?;
        let store = connect_store(&config.store, config.embedding.dimension).await?;
        let pipeline = HybridSearchPipeline::new(embeddings, store, config.pipeline.clone())?;

        tracing::info!(
            provider = %config.embedding.provider,
            model = %config.embedding.model,
            dimension = config.embedding.dimension,
            backend = pipeline.backend_name(),
            "pipeline ready"
        );

        let prometheus = if config.metrics_enabled {
            Some(telemetry::install()?)
        } else {
            None
        };

        Ok(Self::new(config, Arc::new(pipeline), prometheus))
    }
}
