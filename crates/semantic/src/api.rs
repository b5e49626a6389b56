use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::Embedder;
use crate::{EmbeddingConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

impl ApiProviderKind {
    fn from_config(cfg: &EmbeddingConfig) -> Self {
        match cfg.provider.to_ascii_lowercase().as_str() {
            "hf" | "huggingface" => ApiProviderKind::HuggingFace,
            "openai" | "gpt" => ApiProviderKind::OpenAI,
            _ => ApiProviderKind::Custom,
        }
    }
}

/// Remote embedding provider reached over HTTP.
///
/// Holds one pooled [`reqwest::Client`]; cloning the embedder (or sharing it
/// behind an `Arc`) shares the pool, so concurrent requests reuse connections.
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
    provider: ApiProviderKind,
}

impl ApiEmbedder {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        let url = cfg
            .resolved_url()
            .ok_or_else(|| SemanticError::InvalidConfig("api_url is required".into()))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .pool_max_idle_per_host(cfg.pool_max_idle_per_host)
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            dimension: cfg.dimension,
            provider: ApiProviderKind::from_config(cfg),
        })
    }

    fn build_payload(&self, text: &str) -> Value {
        match self.provider {
            ApiProviderKind::HuggingFace => json!({ "inputs": text }),
            ApiProviderKind::OpenAI => json!({
                "model": self.model,
                "input": text,
                "dimensions": self.dimension,
            }),
            ApiProviderKind::Custom => json!({ "text": text }),
        }
    }

    async fn send(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::InvalidResponse(format!("invalid JSON body: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let response = self.send(self.build_payload(text)).await?;
        let mut vectors = parse_embeddings_from_value(response)?;
        if vectors.is_empty() {
            return Err(SemanticError::InvalidResponse(
                "API response did not contain embeddings".into(),
            ));
        }
        Ok(vectors.swap_remove(0))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let mut vectors = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(mut obj) => match obj.remove("embedding") {
                            Some(embedding) => vectors.push(parse_embedding_vector(embedding)?),
                            None => {
                                return Err(SemanticError::InvalidResponse(
                                    "missing `embedding` field in data item".into(),
                                ))
                            }
                        },
                        _ => {
                            return Err(SemanticError::InvalidResponse(
                                "unexpected entry inside `data` array".into(),
                            ))
                        }
                    }
                }
                return Ok(vectors);
            }

            Err(SemanticError::InvalidResponse(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    SemanticError::InvalidResponse("non-finite embedding value".into())
                }),
                other => Err(SemanticError::InvalidResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(SemanticError::InvalidResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder(provider: &str) -> ApiEmbedder {
        ApiEmbedder::new(&EmbeddingConfig {
            provider: provider.into(),
            api_url: Some("http://127.0.0.1:9/embed".into()),
            dimension: 3,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn openai_payload_requests_fixed_dimension() {
        let payload = embedder("openai").build_payload("red shoes");
        assert_eq!(
            payload,
            json!({ "model": "text-embedding-3-small", "input": "red shoes", "dimensions": 3 })
        );
    }

    #[test]
    fn hf_and_custom_payload_shapes() {
        assert_eq!(
            embedder("hf").build_payload("a"),
            json!({ "inputs": "a" })
        );
        assert_eq!(
            embedder("custom").build_payload("a"),
            json!({ "text": "a" })
        );
    }

    #[test]
    fn missing_url_for_custom_provider_fails() {
        let err = ApiEmbedder::new(&EmbeddingConfig {
            provider: "custom".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, SemanticError::InvalidConfig(_)));
    }

    #[test]
    fn parses_openai_data_shape() {
        let vectors = parse_embeddings_from_value(json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": [0.5, -0.25] }],
            "model": "text-embedding-3-small"
        }))
        .unwrap();
        assert_eq!(vectors, vec![vec![0.5, -0.25]]);
    }

    #[test]
    fn parses_collection_formats() {
        let nested = parse_embedding_collection(json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])).unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0], vec![1.0, 2.0, 3.0]);

        let single = parse_embedding_collection(json!([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(single, vec![vec![1.0, 2.0, 3.0]]);

        assert!(parse_embedding_collection(json!([])).unwrap().is_empty());

        let keyed = parse_embeddings_from_value(json!({ "embeddings": [[0.1]] })).unwrap();
        assert_eq!(keyed, vec![vec![0.1]]);
    }

    #[test]
    fn rejects_non_numeric_entries() {
        let err = parse_embedding_vector(json!([1.0, "two"])).unwrap_err();
        assert!(matches!(err, SemanticError::InvalidResponse(_)));

        let err = parse_embeddings_from_value(json!({ "data": [{ "vector": [1.0] }] })).unwrap_err();
        assert!(err.to_string().contains("missing `embedding`"));

        let err = parse_embeddings_from_value(json!({ "result": [] })).unwrap_err();
        assert!(err.to_string().contains("unsupported API response shape"));
    }
}
