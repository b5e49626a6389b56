use thiserror::Error;

/// Errors raised by a fusion backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FusionError {
    /// Connectivity or SQL failure in the backing store.
    #[error("store error: {0}")]
    Store(String),
    /// The store did not answer in time (including pool acquisition).
    #[error("store call timed out")]
    Timeout,
    /// Query or document vector does not match the store's vector dimension.
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A document or returned row could not be used.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// Store configuration is inconsistent.
    #[error("invalid store config: {0}")]
    InvalidConfig(String),
    /// Reading a document corpus from disk failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FusionError {
    fn from(err: std::io::Error) -> Self {
        FusionError::Io(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for FusionError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => FusionError::Timeout,
            other => FusionError::Store(other.to_string()),
        }
    }
}
