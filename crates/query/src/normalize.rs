use serde_json::{Map, Value};

use crate::{Query, QueryConfig, QueryError};

const FIELD_TEXT: &str = "query";
const FIELD_MATCH_COUNT: &str = "matchCount";
const FIELD_FULL_TEXT_WEIGHT: &str = "fullTextWeight";
const FIELD_SEMANTIC_WEIGHT: &str = "semanticWeight";
const FIELD_RRF_K: &str = "rrfK";

/// Upper bound shared with the data store's `int` parameters.
const MAX_STORE_INT: u64 = i32::MAX as u64;

/// Validate a raw request payload and fill in default tuning parameters.
///
/// A payload that is not a JSON object is treated like an empty one, so it
/// fails on the missing query text. Tunables that are absent or `null` take
/// the defaults from `cfg`; tunables that are present must coerce cleanly.
pub fn normalize(raw: &Value, cfg: &QueryConfig) -> Result<Query, QueryError> {
    let empty = Map::new();
    let body = raw.as_object().unwrap_or(&empty);

    let text = match body.get(FIELD_TEXT) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => return Err(QueryError::MissingText),
    };
    if let Some(max) = cfg.max_query_chars {
        if text.chars().count() > max {
            return Err(QueryError::TextTooLong { max });
        }
    }

    let match_count = match present(body, FIELD_MATCH_COUNT) {
        Some(value) => positive_int(FIELD_MATCH_COUNT, value)?,
        None => cfg.default_match_count,
    };
    if match_count > cfg.max_match_count {
        return Err(QueryError::invalid(
            FIELD_MATCH_COUNT,
            format!("must not exceed {}", cfg.max_match_count),
        ));
    }

    let full_text_weight = match present(body, FIELD_FULL_TEXT_WEIGHT) {
        Some(value) => weight(FIELD_FULL_TEXT_WEIGHT, value)?,
        None => cfg.default_full_text_weight,
    };
    let semantic_weight = match present(body, FIELD_SEMANTIC_WEIGHT) {
        Some(value) => weight(FIELD_SEMANTIC_WEIGHT, value)?,
        None => cfg.default_semantic_weight,
    };
    let rrf_k = match present(body, FIELD_RRF_K) {
        Some(value) => positive_int(FIELD_RRF_K, value)?,
        None => cfg.default_rrf_k,
    };

    Ok(Query {
        text,
        match_count,
        full_text_weight,
        semantic_weight,
        rrf_k,
    })
}

fn present<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| !value.is_null())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn positive_int(field: &'static str, value: &Value) -> Result<u32, QueryError> {
    let parsed = match value {
        Value::Number(num) if num.is_u64() => num.as_u64(),
        Value::Number(num) if num.is_i64() => None,
        _ => as_number(value)
            .filter(|n| n.is_finite() && n.fract() == 0.0 && *n >= 0.0)
            .map(|n| n as u64),
    };
    match parsed {
        Some(n) if n >= 1 && n <= MAX_STORE_INT => Ok(n as u32),
        _ => Err(QueryError::invalid(field, "must be a positive integer")),
    }
}

fn weight(field: &'static str, value: &Value) -> Result<f64, QueryError> {
    match as_number(value) {
        Some(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(QueryError::invalid(
            field,
            "must be a finite, non-negative number",
        )),
    }
}
