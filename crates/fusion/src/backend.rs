use async_trait::async_trait;
use std::sync::Arc;

use crate::memory::InMemoryStore;
use crate::{FusionError, FusionParams, ResultSet, StoreConfig};

/// Narrow contract for anything that can run hybrid fusion.
///
/// Implementations must be safe to share across concurrent requests and must
/// return results already in final order; callers never re-sort.
#[async_trait]
pub trait HybridSearch: Send + Sync {
    async fn fuse(
        &self,
        query_text: &str,
        query_embedding: &[f32],
        params: &FusionParams,
    ) -> Result<ResultSet, FusionError>;

    /// Short label for logs.
    fn backend_name(&self) -> &'static str;

    /// Release pooled resources. Called once on shutdown.
    async fn close(&self) {}
}

/// Create the backend described by `cfg`. Vectors are `dimension` long.
pub async fn connect_store(
    cfg: &StoreConfig,
    dimension: usize,
) -> Result<Arc<dyn HybridSearch>, FusionError> {
    cfg.validate()?;
    match cfg.backend.to_ascii_lowercase().as_str() {
        "memory" => {
            let store = match cfg.documents_path.as_deref() {
                Some(path) => InMemoryStore::load_json(path, dimension)?,
                None => InMemoryStore::new(dimension),
            };
            tracing::info!(documents = store.len(), "in-memory store ready");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "postgres")]
        "postgres" => Ok(Arc::new(
            crate::postgres::PgHybridSearch::connect(cfg, dimension).await?,
        )),
        other => Err(FusionError::InvalidConfig(format!(
            "store backend '{other}' is not available in this build"
        ))),
    }
}
