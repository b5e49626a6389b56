//! Settings for the search pipeline itself.
//!
//! Provider and store settings live with their crates
//! ([`semantic::EmbeddingConfig`], [`fusion::StoreConfig`]); this only holds
//! what the orchestrator applies between them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::PipelineError;
use query::QueryConfig;

/// Orchestrator configuration.
///
/// ```rust
/// use hybrid_search::PipelineConfig;
///
/// let cfg: PipelineConfig = serde_json::from_str(r#"{ "embed_timeout_secs": 5 }"#).unwrap();
/// assert_eq!(cfg.embed_timeout().as_secs(), 5);
/// assert_eq!(cfg.store_timeout().as_secs(), 30);
/// assert_eq!(cfg.query.default_rrf_k, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Validation defaults and ceilings.
    pub query: QueryConfig,
    /// Deadline for one embedding provider call.
    pub embed_timeout_secs: u64,
    /// Deadline for one `hybrid_search` call.
    pub store_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
            embed_timeout_secs: 30,
            store_timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    pub fn embed_timeout(&self) -> Duration {
        Duration::from_secs(self.embed_timeout_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.query
            .validate()
            .map_err(|err| PipelineError::Config(err.to_string()))?;
        if self.embed_timeout_secs == 0 || self.store_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "stage timeouts must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
