use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// `POST /hybrid-search`
///
/// Body: `{ query, matchCount?, fullTextWeight?, semanticWeight?, rrfK? }`.
/// Answers `{ data: [...] }` with the store's rows in the store's order.
pub async fn hybrid_search(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<Value>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "unreadable search body");
        ServerError::from(rejection)
    })?;

    let outcome = state.pipeline.handle(&body).await?;
    Ok(Json(json!({ "data": outcome.results })))
}
