//! Postgres backend: delegates fusion to the `hybrid_search` stored procedure.
//!
//! The procedure is expected to take `(query_text text, query_embedding
//! vector(D), match_count int, full_text_weight float, semantic_weight float,
//! rrf_k int)` and return rows already ordered by fused score. Rows are
//! converted with `to_jsonb` so whatever columns the procedure declares pass
//! through untouched; `WITH ORDINALITY` pins the procedure's own row order.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;

use crate::backend::HybridSearch;
use crate::{FusionError, FusionParams, RankedResult, ResultSet, StoreConfig};

pub struct PgHybridSearch {
    pool: PgPool,
    dimension: usize,
    sql: String,
}

impl PgHybridSearch {
    /// Open a pool against `cfg.database_url`. Fails fast when the server is unreachable.
    pub async fn connect(cfg: &StoreConfig, dimension: usize) -> Result<Self, FusionError> {
        cfg.validate()?;
        let url = cfg
            .database_url
            .as_deref()
            .ok_or_else(|| FusionError::InvalidConfig("database_url is required".into()))?;

        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout())
            .connect(url)
            .await?;

        tracing::info!(
            max_connections = cfg.max_connections,
            dimension,
            "postgres pool ready"
        );
        Ok(Self::with_pool(pool, dimension))
    }

    /// Wrap an existing pool.
    pub fn with_pool(pool: PgPool, dimension: usize) -> Self {
        Self {
            pool,
            dimension,
            sql: call_sql(dimension),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn call_sql(dimension: usize) -> String {
    format!(
        "SELECT to_jsonb(h) - 'ordinality' AS record \
         FROM hybrid_search($1::text, $2::real[]::vector({dimension}), $3::int, $4::float, $5::float, $6::int) \
         WITH ORDINALITY AS h \
         ORDER BY h.ordinality"
    )
}

fn to_i32(field: &str, value: u32) -> Result<i32, FusionError> {
    i32::try_from(value)
        .map_err(|_| FusionError::InvalidConfig(format!("{field} {value} exceeds the store's int range")))
}

#[async_trait]
impl HybridSearch for PgHybridSearch {
    async fn fuse(
        &self,
        query_text: &str,
        query_embedding: &[f32],
        params: &FusionParams,
    ) -> Result<ResultSet, FusionError> {
        params.validate()?;
        if query_embedding.len() != self.dimension {
            return Err(FusionError::DimensionMismatch {
                expected: self.dimension,
                actual: query_embedding.len(),
            });
        }

        let rows: Vec<Json<Value>> = sqlx::query_scalar(&self.sql)
            .bind(query_text)
            .bind(query_embedding.to_vec())
            .bind(to_i32("match_count", params.match_count)?)
            .bind(params.full_text_weight)
            .bind(params.semantic_weight)
            .bind(to_i32("rrf_k", params.rrf_k)?)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(rows = rows.len(), "hybrid_search returned");
        rows.into_iter()
            .map(|Json(record)| RankedResult::from_value(record))
            .collect()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
