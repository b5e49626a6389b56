use serde::{Deserialize, Serialize};

/// A query embedding whose length has been checked against the dimension contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// Embedding values, exactly `dimension` long.
    pub vector: Vec<f32>,
    /// Model that produced the vector.
    pub model: String,
    /// Agreed dimension (equal to `vector.len()`).
    pub dimension: usize,
}

impl Embedding {
    pub fn as_slice(&self) -> &[f32] {
        &self.vector
    }
}
