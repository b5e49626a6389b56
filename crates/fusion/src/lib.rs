//! # Hybrid retrieval fusion (`fusion`)
//!
//! ## Purpose
//!
//! `fusion` ranks documents for a query by combining two independent
//! rankings with Reciprocal Rank Fusion (RRF):
//!
//! - a **lexical** ranking by full-text relevance against the query text, and
//! - a **semantic** ranking by similarity between the query embedding and
//!   each document's stored embedding.
//!
//! Each document's fused score is
//!
//! ```text
//! fused_score = full_text_weight / (rrf_k + r_lex) + semantic_weight / (rrf_k + r_sem)
//! ```
//!
//! where a document missing from a ranking gets no term from it. Only ranks
//! matter, so the two channels' incomparable raw scores never need to be
//! normalized against each other.
//!
//! ## Backends
//!
//! Callers talk to a [`HybridSearch`] trait object:
//!
//! - [`InMemoryStore`] runs the whole algorithm in-process (BM25 lexical
//!   ranking + cosine semantic ranking + [`rrf::fuse_rankings`]).
//! - [`PgHybridSearch`] (feature `postgres`) calls the `hybrid_search` stored
//!   procedure in a pgvector-enabled Postgres. `sql/hybrid_search.sql` holds a
//!   compatible definition of that procedure.
//!
//! Both return a [`ResultSet`] already ordered by descending fused score and
//! capped at `match_count`; callers must not re-sort it.
//!
//! ## Example
//!
//! ```
//! use fusion::{Document, FusionParams, HybridSearch, InMemoryStore};
//!
//! # tokio_test_block(async {
//! let store = InMemoryStore::new(2);
//! store.insert(Document::new("a", "red running shoes").with_embedding(vec![1.0, 0.0])).unwrap();
//! store.insert(Document::new("b", "blue sandals").with_embedding(vec![0.0, 1.0])).unwrap();
//!
//! let params = FusionParams::default();
//! let results = store.fuse("red shoes", &[0.9, 0.1], &params).await.unwrap();
//! assert_eq!(results[0].id().and_then(|v| v.as_str()), Some("a"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod lexical;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod rrf;
pub mod types;
pub mod vector;

pub use crate::backend::{connect_store, HybridSearch};
pub use crate::config::StoreConfig;
pub use crate::error::FusionError;
pub use crate::memory::{Document, InMemoryStore};
#[cfg(feature = "postgres")]
pub use crate::postgres::PgHybridSearch;
pub use crate::types::{FusionParams, RankedResult, ResultSet};
