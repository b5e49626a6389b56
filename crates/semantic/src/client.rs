use async_trait::async_trait;
use std::sync::Arc;

use crate::api::ApiEmbedder;
use crate::stub::StubEmbedder;
use crate::{Embedding, EmbeddingConfig, SemanticError};

/// A source of raw embedding vectors.
///
/// Implementations only talk to the provider; checking the result against
/// the dimension contract is [`EmbeddingClient`]'s job.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError>;

    /// Model identifier reported alongside each [`Embedding`].
    fn model(&self) -> &str;
}

/// Embedding stage of the search pipeline.
///
/// Wraps a shared [`Embedder`] and enforces that every vector is exactly
/// `dimension` long. One provider call per [`embed`](Self::embed); nothing is
/// cached and nothing is retried.
#[derive(Clone)]
pub struct EmbeddingClient {
    embedder: Arc<dyn Embedder>,
    dimension: usize,
}

impl EmbeddingClient {
    pub fn new(embedder: Arc<dyn Embedder>, dimension: usize) -> Self {
        Self {
            embedder,
            dimension,
        }
    }

    /// Build the embedder described by `cfg` and wrap it.
    pub fn from_config(cfg: &EmbeddingConfig) -> Result<Self, SemanticError> {
        Ok(Self::new(build_embedder(cfg)?, cfg.dimension))
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> &str {
        self.embedder.model()
    }

    pub async fn embed(&self, text: &str) -> Result<Embedding, SemanticError> {
        let vector = self.embedder.embed(text).await?;
        if vector.len() != self.dimension {
            tracing::warn!(
                expected = self.dimension,
                actual = vector.len(),
                model = self.embedder.model(),
                "embedding dimension mismatch"
            );
            return Err(SemanticError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(Embedding {
            vector,
            model: self.embedder.model().to_string(),
            dimension: self.dimension,
        })
    }
}

/// Construct the embedder selected by `cfg.provider`.
pub fn build_embedder(cfg: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    cfg.validate()?;
    if cfg.is_stub() {
        return Ok(Arc::new(StubEmbedder::new(cfg.dimension)));
    }
    Ok(Arc::new(ApiEmbedder::new(cfg)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEmbedder {
        len: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, SemanticError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.5; self.len])
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    fn fixed(len: usize) -> Arc<FixedEmbedder> {
        Arc::new(FixedEmbedder {
            len,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn matching_dimension_passes_through() {
        let client = EmbeddingClient::new(fixed(4), 4);
        let embedding = client.embed("red shoes").await.unwrap();
        assert_eq!(embedding.vector.len(), 4);
        assert_eq!(embedding.dimension, 4);
        assert_eq!(embedding.model, "fixed");
    }

    #[tokio::test]
    async fn shorter_vector_is_rejected_not_padded() {
        let client = EmbeddingClient::new(fixed(3), 4);
        let err = client.embed("red shoes").await.unwrap_err();
        assert_eq!(
            err,
            SemanticError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[tokio::test]
    async fn longer_vector_is_rejected_not_truncated() {
        let client = EmbeddingClient::new(fixed(5), 4);
        assert!(matches!(
            client.embed("red shoes").await,
            Err(SemanticError::DimensionMismatch { actual: 5, .. })
        ));
    }

    #[tokio::test]
    async fn identical_text_calls_provider_every_time() {
        let embedder = fixed(2);
        let client = EmbeddingClient::new(embedder.clone(), 2);
        client.embed("same").await.unwrap();
        client.embed("same").await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn from_config_builds_stub() {
        let client = EmbeddingClient::from_config(&EmbeddingConfig {
            provider: "stub".into(),
            dimension: 16,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.dimension(), 16);
        assert_eq!(client.embed("hello").await.unwrap().vector.len(), 16);
    }
}
