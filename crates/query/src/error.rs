//! Error types produced while validating a search request.
//!
//! Every variant is a client-side problem: the request is rejected locally and
//! no upstream call is made. Servers map the whole enum to `400 Bad Request`.
use thiserror::Error;

/// Errors that can occur while turning a raw payload into a [`Query`](crate::Query).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryError {
    /// `query` was absent, not a string, or empty.
    #[error("missing or malformed query text")]
    MissingText,

    /// A tuning parameter was present but unusable.
    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Query text exceeded the configured character ceiling.
    #[error("query text exceeds {max} characters")]
    TextTooLong { max: usize },

    /// The [`QueryConfig`](crate::QueryConfig) itself is inconsistent.
    #[error("invalid query config: {0}")]
    InvalidConfig(String),
}

impl QueryError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        QueryError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_message_is_stable() {
        assert_eq!(
            QueryError::MissingText.to_string(),
            "missing or malformed query text"
        );
    }

    #[test]
    fn invalid_field_names_the_wire_field() {
        let err = QueryError::invalid("rrfK", "must be a positive integer");
        assert_eq!(err.to_string(), "invalid `rrfK`: must be a positive integer");
    }

    #[test]
    fn text_too_long_reports_ceiling() {
        let err = QueryError::TextTooLong { max: 256 };
        assert!(err.to_string().contains("256"));
    }
}
