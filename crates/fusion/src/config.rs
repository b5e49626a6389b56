use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::FusionError;

/// Where fused rankings come from and how connections to it are pooled.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// `"postgres"` (default) or `"memory"`.
    pub backend: String,
    /// Postgres connection string; required for the postgres backend.
    #[serde(skip_serializing)]
    pub database_url: Option<String>,
    /// Upper bound on pooled connections shared by all in-flight requests.
    pub max_connections: u32,
    /// How long a request waits for a pooled connection before failing.
    pub acquire_timeout_secs: u64,
    /// JSON array of documents loaded into the memory backend on boot.
    pub documents_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "postgres".into(),
            database_url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
            documents_path: None,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("documents_path", &self.documents_path)
            .finish()
    }
}

impl StoreConfig {
    /// In-memory backend, optionally seeded from a JSON file.
    pub fn memory(documents_path: Option<PathBuf>) -> Self {
        Self {
            backend: "memory".into(),
            documents_path,
            ..Default::default()
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn is_memory(&self) -> bool {
        self.backend.eq_ignore_ascii_case("memory")
    }

    pub fn validate(&self) -> Result<(), FusionError> {
        match self.backend.to_ascii_lowercase().as_str() {
            "memory" => Ok(()),
            "postgres" => {
                if self.database_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
                    return Err(FusionError::InvalidConfig(
                        "database_url is required for the postgres backend".into(),
                    ));
                }
                if self.max_connections == 0 {
                    return Err(FusionError::InvalidConfig(
                        "max_connections must be greater than zero".into(),
                    ));
                }
                Ok(())
            }
            other => Err(FusionError::InvalidConfig(format!(
                "unsupported store backend '{other}'"
            ))),
        }
    }
}
