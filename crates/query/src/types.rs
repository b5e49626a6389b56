use serde::{Deserialize, Serialize};

use crate::{QueryConfig, QueryError};

/// A validated, fully-defaulted search request.
///
/// Constructed once per HTTP call by [`normalize`](crate::normalize), consumed
/// by the pipeline, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Free-text query; never empty.
    pub text: String,
    /// Maximum number of fused results to return.
    pub match_count: u32,
    /// Weight of the lexical (full-text) ranking. Zero disables the channel.
    pub full_text_weight: f64,
    /// Weight of the semantic (vector) ranking. Zero disables the channel.
    pub semantic_weight: f64,
    /// RRF smoothing constant.
    pub rrf_k: u32,
}

impl Query {
    /// Build a query with the contract defaults for every tunable.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            match_count: 10,
            full_text_weight: 1.0,
            semantic_weight: 1.0,
            rrf_k: 50,
        }
    }

    pub fn with_match_count(mut self, match_count: u32) -> Self {
        self.match_count = match_count;
        self
    }

    pub fn with_weights(mut self, full_text_weight: f64, semantic_weight: f64) -> Self {
        self.full_text_weight = full_text_weight;
        self.semantic_weight = semantic_weight;
        self
    }

    pub fn with_rrf_k(mut self, rrf_k: u32) -> Self {
        self.rrf_k = rrf_k;
        self
    }

    /// Re-check a query that was built in code rather than by
    /// [`normalize`](crate::normalize).
    pub fn validate(&self, cfg: &QueryConfig) -> Result<(), QueryError> {
        if self.text.is_empty() {
            return Err(QueryError::MissingText);
        }
        if let Some(max) = cfg.max_query_chars {
            if self.text.chars().count() > max {
                return Err(QueryError::TextTooLong { max });
            }
        }
        if self.match_count == 0 || self.match_count > cfg.max_match_count {
            return Err(QueryError::invalid(
                "matchCount",
                format!("must be within 1..={}", cfg.max_match_count),
            ));
        }
        if self.rrf_k == 0 || self.rrf_k > i32::MAX as u32 {
            return Err(QueryError::invalid("rrfK", "must be a positive integer"));
        }
        for (field, weight) in [
            ("fullTextWeight", self.full_text_weight),
            ("semanticWeight", self.semantic_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(QueryError::invalid(
                    field,
                    "must be a finite, non-negative number",
                ));
            }
        }
        Ok(())
    }
}
