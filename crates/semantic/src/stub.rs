use async_trait::async_trait;
use fxhash::hash64;

use crate::client::Embedder;
use crate::normalize::l2_normalize_in_place;
use crate::SemanticError;

/// Deterministic embedder for local runs and tests.
///
/// Values are sinusoids seeded by a hash of the text, so the same text always
/// maps to the same unit-length vector and different texts almost never collide.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimension];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            *value = ((h >> (idx % 32)) as f32 * 0.0001 + idx as f32).sin();
        }
        l2_normalize_in_place(&mut v);
        v
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        Ok(self.vector_for(text))
    }

    fn model(&self) -> &str {
        "stub"
    }
}
