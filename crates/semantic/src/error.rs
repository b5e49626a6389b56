use thiserror::Error;

/// Errors surfaced while producing a query embedding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// Provider returned a vector whose length differs from the agreed dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Configuration is inconsistent (e.g., api mode without a URL).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// Transport-level failure talking to the provider.
    #[error("embedding request failed: {0}")]
    Request(String),
    /// The provider did not answer within the configured timeout.
    #[error("embedding request timed out")]
    Timeout,
    /// Non-2xx answer (auth failure, rate limit, provider outage, ...).
    #[error("embedding provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The provider answered 2xx with a body we could not read as an embedding.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}

impl SemanticError {
    /// Whether the provider rejected us for sending too many requests.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SemanticError::Status { status: 429, .. })
    }
}

impl From<reqwest::Error> for SemanticError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SemanticError::Timeout
        } else {
            SemanticError::Request(err.to_string())
        }
    }
}
