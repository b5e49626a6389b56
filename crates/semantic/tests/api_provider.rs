//! Exercises `ApiEmbedder` + `EmbeddingClient` against a local stub provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use semantic::{EmbeddingClient, EmbeddingConfig, SemanticError};
use serde_json::{json, Value};

async fn spawn_provider(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1/embeddings")
}

fn openai_config(url: String, dimension: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        provider: "openai".into(),
        api_url: Some(url),
        api_key: Some("sk-test".into()),
        dimension,
        timeout_secs: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn openai_request_shape_and_success() {
    let seen: Arc<Mutex<Option<(Value, String)>>> = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let router = Router::new().route(
        "/v1/embeddings",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *captured.lock().unwrap() = Some((body, auth));
                Json(json!({
                    "object": "list",
                    "data": [{ "object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3, 0.4] }]
                }))
            }
        }),
    );
    let url = spawn_provider(router).await;

    let client = EmbeddingClient::from_config(&openai_config(url, 4)).unwrap();
    let embedding = client.embed("red shoes").await.unwrap();
    assert_eq!(embedding.vector, vec![0.1, 0.2, 0.3, 0.4]);
    assert_eq!(embedding.model, "text-embedding-3-small");

    let (body, auth) = seen.lock().unwrap().clone().expect("provider was called");
    assert_eq!(body["input"], "red shoes");
    assert_eq!(body["model"], "text-embedding-3-small");
    assert_eq!(body["dimensions"], 4);
    assert_eq!(auth, "Bearer sk-test");
}

#[tokio::test]
async fn wrong_dimension_from_provider_is_fatal() {
    let router = Router::new().route(
        "/v1/embeddings",
        post(|| async { Json(json!({ "data": [{ "embedding": [0.1, 0.2] }] })) }),
    );
    let url = spawn_provider(router).await;

    let client = EmbeddingClient::from_config(&openai_config(url, 4)).unwrap();
    let err = client.embed("red shoes").await.unwrap_err();
    assert_eq!(
        err,
        SemanticError::DimensionMismatch {
            expected: 4,
            actual: 2
        }
    );
}

#[tokio::test]
async fn auth_failure_surfaces_status_without_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/v1/embeddings",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::UNAUTHORIZED, "invalid api key")
            }
        }),
    );
    let url = spawn_provider(router).await;

    let client = EmbeddingClient::from_config(&openai_config(url, 4)).unwrap();
    let err = client.embed("red shoes").await.unwrap_err();
    assert_eq!(
        err,
        SemanticError::Status {
            status: 401,
            body: "invalid api key".into()
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rate_limit_is_reported_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/v1/embeddings",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::TOO_MANY_REQUESTS, "slow down")
            }
        }),
    );
    let url = spawn_provider(router).await;

    let client = EmbeddingClient::from_config(&openai_config(url, 4)).unwrap();
    let err = client.embed("red shoes").await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let router = Router::new().route(
        "/v1/embeddings",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "data": [{ "embedding": [0.1] }] }))
        }),
    );
    let url = spawn_provider(router).await;

    let cfg = EmbeddingConfig {
        timeout_secs: 1,
        ..openai_config(url, 1)
    };
    let client = EmbeddingClient::from_config(&cfg).unwrap();
    assert_eq!(client.embed("red shoes").await.unwrap_err(), SemanticError::Timeout);
}

#[tokio::test]
async fn unreachable_provider_is_a_request_error() -> anyhow::Result<()> {
    // Port 9 (discard) is almost never listening locally.
    let client = EmbeddingClient::from_config(&openai_config(
        "http://127.0.0.1:9/v1/embeddings".into(),
        4,
    ))?;
    let err = client.embed("red shoes").await.unwrap_err();
    assert!(matches!(
        err,
        SemanticError::Request(_) | SemanticError::Timeout
    ));
    Ok(())
}
