use thiserror::Error;

use fusion::FusionError;
use query::QueryError;
use semantic::SemanticError;

/// Errors that end a search request.
///
/// Only [`InvalidArgument`](Self::InvalidArgument) is the caller's fault.
/// Everything else is an upstream or deployment problem and must be reported
/// to clients as an opaque internal error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] QueryError),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimensionMismatch { expected: usize, actual: usize },
    #[error("embedding provider failure: {0}")]
    UpstreamEmbedding(SemanticError),
    #[error("data store failure: {0}")]
    UpstreamStore(FusionError),
    #[error("invalid pipeline config: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether the request itself was at fault (maps to `400`).
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidArgument(_))
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidArgument(_) => "invalid_argument",
            PipelineError::EmbeddingDimensionMismatch { .. } => "embedding_dimension_mismatch",
            PipelineError::UpstreamEmbedding(_) => "upstream_embedding",
            PipelineError::UpstreamStore(_) => "upstream_store",
            PipelineError::Config(_) => "config",
        }
    }
}

impl From<SemanticError> for PipelineError {
    fn from(err: SemanticError) -> Self {
        match err {
            SemanticError::DimensionMismatch { expected, actual } => {
                PipelineError::EmbeddingDimensionMismatch { expected, actual }
            }
            other => PipelineError::UpstreamEmbedding(other),
        }
    }
}

impl From<FusionError> for PipelineError {
    fn from(err: FusionError) -> Self {
        match err {
            FusionError::DimensionMismatch { expected, actual } => {
                PipelineError::EmbeddingDimensionMismatch { expected, actual }
            }
            other => PipelineError::UpstreamStore(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_argument_is_a_client_error() {
        assert!(PipelineError::from(QueryError::MissingText).is_client_error());
        assert!(!PipelineError::from(SemanticError::Timeout).is_client_error());
        assert!(!PipelineError::from(FusionError::Timeout).is_client_error());
        assert!(!PipelineError::Config("x".into()).is_client_error());
    }

    #[test]
    fn dimension_mismatch_is_lifted_from_either_stage() {
        let from_provider = PipelineError::from(SemanticError::DimensionMismatch {
            expected: 1536,
            actual: 3,
        });
        assert_eq!(
            from_provider,
            PipelineError::EmbeddingDimensionMismatch {
                expected: 1536,
                actual: 3
            }
        );
        let from_store = PipelineError::from(FusionError::DimensionMismatch {
            expected: 1536,
            actual: 3,
        });
        assert_eq!(from_store.kind(), "embedding_dimension_mismatch");
    }

    #[test]
    fn upstream_errors_keep_their_cause() {
        let err = PipelineError::from(SemanticError::Status {
            status: 401,
            body: "bad key".into(),
        });
        assert!(err.to_string().contains("401"));
        assert_eq!(err.kind(), "upstream_embedding");
    }
}
