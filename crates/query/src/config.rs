//! Defaults and ceilings applied during normalization.
use serde::{Deserialize, Serialize};

use crate::QueryError;

/// Tunable defaults for query normalization.
///
/// The default values reproduce the service's public contract
/// (`matchCount=10, fullTextWeight=1, semanticWeight=1, rrfK=50`). The only
/// addition is `max_match_count`, a ceiling that keeps a single request from
/// asking the store for an unbounded result set.
///
/// ```rust
/// use query::QueryConfig;
///
/// let cfg = QueryConfig::default();
/// assert_eq!(cfg.default_match_count, 10);
/// assert_eq!(cfg.max_match_count, 1000);
/// cfg.validate().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    /// Result count used when `matchCount` is absent.
    pub default_match_count: u32,
    /// Lexical channel weight used when `fullTextWeight` is absent.
    pub default_full_text_weight: f64,
    /// Semantic channel weight used when `semanticWeight` is absent.
    pub default_semantic_weight: f64,
    /// RRF smoothing constant used when `rrfK` is absent.
    pub default_rrf_k: u32,
    /// Largest `matchCount` a caller may request.
    pub max_match_count: u32,
    /// Optional ceiling on query length, counted in chars.
    pub max_query_chars: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_match_count: 10,
            default_full_text_weight: 1.0,
            default_semantic_weight: 1.0,
            default_rrf_k: 50,
            max_match_count: 1000,
            max_query_chars: None,
        }
    }
}

impl QueryConfig {
    /// Check that the defaults themselves satisfy the constraints they enforce.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.max_match_count == 0 {
            return Err(QueryError::InvalidConfig(
                "max_match_count must be greater than zero".into(),
            ));
        }
        if self.default_match_count == 0 || self.default_match_count > self.max_match_count {
            return Err(QueryError::InvalidConfig(format!(
                "default_match_count must be within 1..={}",
                self.max_match_count
            )));
        }
        if self.default_rrf_k == 0 {
            return Err(QueryError::InvalidConfig(
                "default_rrf_k must be greater than zero".into(),
            ));
        }
        for (name, weight) in [
            ("default_full_text_weight", self.default_full_text_weight),
            ("default_semantic_weight", self.default_semantic_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(QueryError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number"
                )));
            }
        }
        if self.max_query_chars == Some(0) {
            return Err(QueryError::InvalidConfig(
                "max_query_chars must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}
