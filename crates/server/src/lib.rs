//! Hybrid search server: HTTP API for the query orchestrator
//!
//! Exposes [`hybrid_search::HybridSearchPipeline`] over axum. Each search
//! request is validated, embedded through the configured provider, and fused
//! by the configured store (Postgres `hybrid_search` procedure or the
//! in-memory backend).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /health` - `{ "status": "ok", "date": "<ISO-8601>" }`
//! - `POST /hybrid-search` - `{ "data": [...] }`, `400 { "error": ... }` for
//!   bad input, `500 { "error": "internal error" }` for upstream failures
//! - `GET /metrics` - Prometheus text format (when `metrics_enabled`)
//!
//! # Configuration
//!
//! Read from `.env`, an optional `hybrid-search.{toml,yaml,json}` and
//! `HYBRID_SEARCH__*` variables (`HYBRID_SEARCH__STORE__BACKEND=memory`).
//! `PORT`, `DATABASE_URL` and `OPENAI_API_KEY` are honoured as well.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
