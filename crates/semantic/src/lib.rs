//! Query embedding for hybrid search
//!
//! This crate turns validated query text into a dense vector. The vector is
//! handed to the fusion stage together with the original text, so its length
//! has to match the dimension the store's vector column was declared with.
//! [`EmbeddingClient`] owns that contract: a vector of any other length is an
//! error, never truncated or padded.
//!
//! Two embedders ship here:
//!
//! - **API** ([`ApiEmbedder`]) - calls a remote provider over HTTP. OpenAI's
//!   `/v1/embeddings` is the default; Hugging Face and a bare `{ "text": .. }`
//!   shape are also understood.
//! - **Stub** ([`StubEmbedder`]) - deterministic vectors derived from a hash of
//!   the text. No network, no cost. Handy for local runs and tests.
//!
//! Anything else can plug in by implementing [`Embedder`].
//!
//! ## What this crate does not do
//!
//! No caching (identical text hits the provider every time) and no retries.
//! Both are policies for a layer in front of this one.
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{build_embedder, EmbeddingClient, EmbeddingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), semantic::SemanticError> {
//!     let cfg = EmbeddingConfig {
//!         api_key: Some("sk-...".into()),
//!         ..Default::default()
//!     };
//!     let client = EmbeddingClient::new(build_embedder(&cfg)?, cfg.dimension);
//!     let embedding = client.embed("red shoes").await?;
//!     assert_eq!(embedding.vector.len(), 1536);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod types;

mod api;
mod client;
mod normalize;
mod stub;

pub use crate::api::ApiEmbedder;
pub use crate::client::{build_embedder, Embedder, EmbeddingClient};
pub use crate::config::EmbeddingConfig;
pub use crate::error::SemanticError;
pub use crate::normalize::{cosine_similarity, l2_normalize_in_place};
pub use crate::stub::StubEmbedder;
pub use crate::types::Embedding;
