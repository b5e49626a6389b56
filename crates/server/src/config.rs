use fusion::StoreConfig;
use hybrid_search::PipelineConfig;
use semantic::EmbeddingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

/// Environment prefix for every setting, e.g. `HYBRID_SEARCH__STORE__BACKEND=memory`.
pub const ENV_PREFIX: &str = "HYBRID_SEARCH";

/// Conventional unprefixed variables and the nested keys they feed.
/// Prefixed variables win when both are set.
const PLAIN_ENV_VARS: [(&str, &str); 3] = [
    ("PORT", "PORT"),
    ("DATABASE_URL", "STORE__DATABASE_URL"),
    ("OPENAI_API_KEY", "EMBEDDING__API_KEY"),
];

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whole-request timeout in seconds. Must exceed the sum of the
    /// pipeline's stage deadlines.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Embedding provider
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Backend running `hybrid_search`
    #[serde(default)]
    pub store: StoreConfig,

    /// Validation defaults and per-stage deadlines
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            embedding: EmbeddingConfig::default(),
            store: StoreConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `hybrid-search.{toml,yaml,json}`
    /// file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::load_from(Some("hybrid-search"), std::env::vars().collect())
    }

    /// Same as [`load`](Self::load) with an explicit file stem and environment.
    pub fn load_from(file: Option<&str>, env: HashMap<String, String>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(name) = file {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }
        let plain: config::Map<String, String> = PLAIN_ENV_VARS
            .iter()
            .filter_map(|(var, key)| env.get(*var).map(|value| (key.to_string(), value.clone())))
            .collect();
        let plain = config::Environment::default()
            .separator("__")
            .source(Some(plain));
        let prefixed = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(env.into_iter().collect()));

        let config: ServerConfig = builder
            .add_source(plain)
            .add_source(prefixed)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.max_body_size_mb == 0 {
            anyhow::bail!("max_body_size_mb must be greater than zero");
        }
        self.socket_addr()?;
        self.embedding.validate()?;
        self.store.validate()?;
        self.pipeline.validate()?;

        let stages = self.pipeline.embed_timeout_secs + self.pipeline.store_timeout_secs;
        if self.timeout_secs <= stages {
            anyhow::bail!(
                "timeout_secs ({}) must exceed embed_timeout_secs + store_timeout_secs ({stages})",
                self.timeout_secs
            );
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    65
}

fn default_max_body_size_mb() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
