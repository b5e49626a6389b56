//! Hybrid search query orchestrator.
//!
//! One request flows through three stages, strictly in this order:
//!
//! 1. [`query::normalize`] validates the raw JSON body and fills defaults.
//! 2. [`semantic::EmbeddingClient`] turns the query text into a vector of the
//!    agreed dimension.
//! 3. A [`fusion::HybridSearch`] backend fuses a lexical and a semantic
//!    ranking with Reciprocal Rank Fusion.
//!
//! [`HybridSearchPipeline::handle`] runs the sequence and short-circuits on
//! the first failure. Results come back exactly as the store ordered them.
//!
//! ```rust
//! use std::sync::Arc;
//! use hybrid_search::{HybridSearchPipeline, PipelineConfig};
//! use fusion::{Document, InMemoryStore};
//! use semantic::{EmbeddingClient, StubEmbedder};
//! use serde_json::json;
//!
//! # tokio_block_on(async {
//! let stub = StubEmbedder::new(8);
//! let store = InMemoryStore::new(8);
//! store
//!     .insert(Document::new("a", "red shoes").with_embedding(stub.vector_for("red shoes")))
//!     .unwrap();
//!
//! let pipeline = HybridSearchPipeline::new(
//!     EmbeddingClient::new(Arc::new(stub), 8),
//!     Arc::new(store),
//!     PipelineConfig::default(),
//! )
//! .unwrap();
//!
//! let outcome = pipeline.handle(&json!({ "query": "red shoes" })).await.unwrap();
//! assert_eq!(outcome.query.match_count, 10);
//! assert_eq!(outcome.results.len(), 1);
//! # });
//! # fn tokio_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
mod error;
mod metrics;
mod pipeline;

pub use crate::config::PipelineConfig;
pub use crate::error::PipelineError;
pub use crate::metrics::{PipelineMetrics, set_pipeline_metrics};
pub use crate::pipeline::{HybridSearchPipeline, SearchOutcome, fusion_params};

pub use fusion::{FusionParams, HybridSearch, RankedResult, ResultSet};
pub use query::{Query, QueryConfig, QueryError};
pub use semantic::{Embedder, EmbeddingClient, SemanticError};
