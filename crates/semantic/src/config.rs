use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::SemanticError;

/// OpenAI embeddings endpoint used when `provider = "openai"` and no URL is set.
pub const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Runtime configuration for the embedding provider.
///
/// The defaults describe OpenAI's `text-embedding-3-small` truncated to 1536
/// dimensions, which is what the `hybrid_search` procedure's vector column is
/// typed to. Only the API key is needed on top.
///
/// # Example
/// ```
/// use semantic::EmbeddingConfig;
///
/// let cfg = EmbeddingConfig {
///     provider: "stub".into(),
///     dimension: 8,
///     ..Default::default()
/// };
/// cfg.validate().unwrap();
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"openai"` (default), `"hf"`, `"custom"`, or `"stub"`.
    pub provider: String,
    /// Endpoint URL. Falls back to [`OPENAI_EMBEDDINGS_URL`] for the openai provider.
    pub api_url: Option<String>,
    /// Bearer token sent in the `Authorization` header.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier sent to the provider.
    pub model: String,
    /// Dimension contract shared with the store.
    pub dimension: usize,
    /// Whole-request timeout for one provider call.
    pub timeout_secs: u64,
    /// TCP/TLS connect timeout.
    pub connect_timeout_secs: u64,
    /// Idle pooled connections kept per provider host.
    pub pool_max_idle_per_host: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            api_url: None,
            api_key: None,
            model: "text-embedding-3-small".into(),
            dimension: 1536,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            pool_max_idle_per_host: 32,
        }
    }
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn is_stub(&self) -> bool {
        self.provider.eq_ignore_ascii_case("stub")
    }

    /// Endpoint to call, resolving the OpenAI default.
    pub fn resolved_url(&self) -> Option<&str> {
        match self.api_url.as_deref() {
            Some(url) => Some(url),
            None if self.provider.eq_ignore_ascii_case("openai") => Some(OPENAI_EMBEDDINGS_URL),
            None => None,
        }
    }

    pub fn validate(&self) -> Result<(), SemanticError> {
        if self.dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        if self.is_stub() {
            return Ok(());
        }
        if self.model.trim().is_empty() {
            return Err(SemanticError::InvalidConfig("model must not be empty".into()));
        }
        if self.resolved_url().is_none() {
            return Err(SemanticError::InvalidConfig(format!(
                "api_url is required for provider '{}'",
                self.provider
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SemanticError::InvalidConfig(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
