use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::FusionError;

/// Tuning knobs for one fusion call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionParams {
    /// Maximum number of results returned.
    pub match_count: u32,
    /// Weight of the lexical ranking's reciprocal term.
    pub full_text_weight: f64,
    /// Weight of the semantic ranking's reciprocal term.
    pub semantic_weight: f64,
    /// RRF smoothing constant; larger values flatten the rank curve.
    pub rrf_k: u32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            match_count: 10,
            full_text_weight: 1.0,
            semantic_weight: 1.0,
            rrf_k: 50,
        }
    }
}

impl FusionParams {
    pub fn validate(&self) -> Result<(), FusionError> {
        if self.match_count == 0 {
            return Err(FusionError::InvalidConfig(
                "match_count must be greater than zero".into(),
            ));
        }
        if self.rrf_k == 0 {
            return Err(FusionError::InvalidConfig(
                "rrf_k must be greater than zero".into(),
            ));
        }
        if !(self.full_text_weight.is_finite() && self.full_text_weight >= 0.0)
            || !(self.semantic_weight.is_finite() && self.semantic_weight >= 0.0)
        {
            return Err(FusionError::InvalidConfig(
                "weights must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// One row of a fused result set.
///
/// The record is opaque: whatever columns the backend produced are kept as-is
/// and serialized unchanged. Accessors cover the two fields most callers look
/// at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedResult(Map<String, Value>);

impl RankedResult {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, FusionError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(FusionError::InvalidDocument(format!(
                "result row must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    pub fn fused_score(&self) -> Option<f64> {
        self.0.get("fused_score").and_then(Value::as_f64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Fused results in final order (descending fused score), at most `match_count` long.
pub type ResultSet = Vec<RankedResult>;
