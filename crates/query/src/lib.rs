//! Query validation and normalization for hybrid search.
//!
//! `query` is the first stage of every search request. It accepts the raw,
//! free-form JSON body a caller sent, checks its shape, fills in default
//! tuning parameters, and yields a typed [`Query`] that later stages can trust.
//!
//! Nothing here touches the network. A request that fails validation never
//! reaches the (billable) embedding provider.
//!
//! # Defaults
//!
//! | Wire field | Default | Constraint |
//! |------------|---------|------------|
//! | `query` | required | non-empty string |
//! | `matchCount` | 10 | integer in `1..=max_match_count` |
//! | `fullTextWeight` | 1.0 | finite, `>= 0` |
//! | `semanticWeight` | 1.0 | finite, `>= 0` |
//! | `rrfK` | 50 | positive integer |
//!
//! Missing or `null` tunables take their default rather than failing the
//! request; only the query text is mandatory.
//!
//! # Example
//!
//! ```rust
//! use query::{normalize, QueryConfig};
//! use serde_json::json;
//!
//! let cfg = QueryConfig::default();
//! let q = normalize(&json!({ "query": "red shoes", "matchCount": 2 }), &cfg).unwrap();
//!
//! assert_eq!(q.text, "red shoes");
//! assert_eq!(q.match_count, 2);
//! assert_eq!(q.rrf_k, 50);
//! ```

pub mod config;
pub mod error;
mod normalize;
pub mod types;

pub use crate::config::QueryConfig;
pub use crate::error::QueryError;
pub use crate::normalize::normalize;
pub use crate::types::Query;
