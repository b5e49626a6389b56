//! In-process implementation of the hybrid search contract.
//!
//! Documents live in insertion order behind one mutex together with their
//! BM25 index. A query ranks every document twice (lexically with
//! [`LexicalRanker`], semantically with [`rank_by_similarity`]) and fuses the
//! two rankings with [`fuse_rankings`]. Ties fall back to insertion order.
//!
//! Scoring is CPU-bound, so [`HybridSearch::fuse`] runs it on tokio's blocking
//! pool. A caller's deadline releases the async worker at once; the scan
//! itself still runs to completion on its blocking thread.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::HybridSearch;
use crate::lexical::LexicalRanker;
use crate::rrf::fuse_rankings;
use crate::vector::rank_by_similarity;
use crate::{FusionError, FusionParams, RankedResult, ResultSet};

/// A searchable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Value,
    /// Stored embedding; documents without one never get a semantic rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Value::Null,
            embedding: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

#[derive(Default)]
struct Corpus {
    docs: Vec<Document>,
    positions: HashMap<String, usize>,
    lexical: LexicalRanker,
}

/// Hybrid search over documents held in memory. Clones share one corpus.
#[derive(Clone)]
pub struct InMemoryStore {
    dimension: usize,
    corpus: Arc<Mutex<Corpus>>,
}

impl InMemoryStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            corpus: Arc::new(Mutex::new(Corpus::default())),
        }
    }

    pub fn from_documents<I>(dimension: usize, docs: I) -> Result<Self, FusionError>
    where
        I: IntoIterator<Item = Document>,
    {
        let store = Self::new(dimension);
        for doc in docs {
            store.insert(doc)?;
        }
        Ok(store)
    }

    /// Load a JSON array of [`Document`]s.
    pub fn load_json(path: &Path, dimension: usize) -> Result<Self, FusionError> {
        let raw = std::fs::read_to_string(path)?;
        let docs: Vec<Document> = serde_json::from_str(&raw).map_err(|e| {
            FusionError::InvalidDocument(format!("{}: {e}", path.display()))
        })?;
        Self::from_documents(dimension, docs)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Add a document, or replace the one with the same id in place.
    pub fn insert(&self, doc: Document) -> Result<(), FusionError> {
        if doc.id.is_empty() {
            return Err(FusionError::InvalidDocument("document id must not be empty".into()));
        }
        if let Some(embedding) = doc.embedding.as_ref() {
            self.check_dimension(embedding.len())?;
        }

        let mut corpus = self.lock();
        let corpus = &mut *corpus;
        match corpus.positions.get(&doc.id).copied() {
            Some(pos) => {
                corpus.lexical.upsert(pos as u64, doc.content.clone());
                corpus.docs[pos] = doc;
            }
            None => {
                let pos = corpus.docs.len();
                corpus.lexical.upsert(pos as u64, doc.content.clone());
                corpus.positions.insert(doc.id.clone(), pos);
                corpus.docs.push(doc);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronous core of [`HybridSearch::fuse`].
    pub fn search(
        &self,
        query_text: &str,
        query_embedding: &[f32],
        params: &FusionParams,
    ) -> Result<ResultSet, FusionError> {
        params.validate()?;
        self.check_dimension(query_embedding.len())?;

        let corpus = self.lock();
        let lexical: Vec<usize> = if params.full_text_weight > 0.0 {
            corpus
                .lexical
                .rank(query_text)
                .into_iter()
                .map(|key| key as usize)
                .collect()
        } else {
            Vec::new()
        };
        let semantic: Vec<usize> = if params.semantic_weight > 0.0 {
            rank_by_similarity(
                query_embedding,
                corpus
                    .docs
                    .iter()
                    .enumerate()
                    .filter_map(|(pos, doc)| doc.embedding.as_deref().map(|e| (pos, e))),
            )
        } else {
            Vec::new()
        };

        let fused = fuse_rankings(&lexical, &semantic, params);
        tracing::debug!(
            lexical_hits = lexical.len(),
            semantic_hits = semantic.len(),
            returned = fused.len(),
            "in-memory fusion"
        );

        fused
            .into_iter()
            .map(|entry| {
                let doc = &corpus.docs[entry.key];
                RankedResult::from_value(json!({
                    "id": doc.id,
                    "content": doc.content,
                    "metadata": doc.metadata,
                    "fused_score": entry.score,
                    "full_text_rank": entry.lexical_rank,
                    "semantic_rank": entry.semantic_rank,
                }))
            })
            .collect()
    }

    fn check_dimension(&self, actual: usize) -> Result<(), FusionError> {
        if actual != self.dimension {
            return Err(FusionError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Corpus> {
        self.corpus.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HybridSearch for InMemoryStore {
    async fn fuse(
        &self,
        query_text: &str,
        query_embedding: &[f32],
        params: &FusionParams,
    ) -> Result<ResultSet, FusionError> {
        let store = self.clone();
        let text = query_text.to_owned();
        let embedding = query_embedding.to_vec();
        let params = *params;
        tokio::task::spawn_blocking(move || store.search(&text, &embedding, &params))
            .await
            .map_err(|err| FusionError::Store(format!("in-memory search task failed: {err}")))?
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryStore {
        InMemoryStore::from_documents(
            2,
            vec![
                Document::new("shoes", "red running shoes").with_embedding(vec![1.0, 0.0]),
                Document::new("jacket", "blue denim jacket").with_embedding(vec![0.0, 1.0]),
                Document::new("plain", "red shoes without a vector"),
            ],
        )
        .unwrap()
    }

    fn ids(results: &ResultSet) -> Vec<&str> {
        results
            .iter()
            .filter_map(|r| r.id().and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn rejects_wrong_dimension_on_insert() {
        let store = InMemoryStore::new(3);
        let err = store
            .insert(Document::new("a", "text").with_embedding(vec![1.0]))
            .unwrap_err();
        assert_eq!(err, FusionError::DimensionMismatch { expected: 3, actual: 1 });
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_wrong_dimension_on_query() {
        let err = store()
            .search("red", &[1.0, 0.0, 0.0], &FusionParams::default())
            .unwrap_err();
        assert!(matches!(err, FusionError::DimensionMismatch { .. }));
    }

    #[test]
    fn rejects_empty_id() {
        assert!(InMemoryStore::new(2).insert(Document::new("", "x")).is_err());
    }

    #[test]
    fn documents_without_embedding_only_rank_lexically() {
        let params = FusionParams {
            full_text_weight: 0.0,
            ..Default::default()
        };
        let results = store().search("red shoes", &[1.0, 0.0], &params).unwrap();
        assert!(!ids(&results).contains(&"plain"));
        assert_eq!(ids(&results), vec!["shoes", "jacket"]);
    }

    #[test]
    fn result_records_carry_scores_and_ranks() {
        let results = store()
            .search("red shoes", &[1.0, 0.0], &FusionParams::default())
            .unwrap();
        let top = &results[0];
        assert_eq!(top.id().and_then(Value::as_str), Some("shoes"));
        assert_eq!(top.get("semantic_rank"), Some(&json!(1)));
        assert!(top.get("full_text_rank").is_some_and(|v| v.is_u64()));
        assert!(top.fused_score().unwrap() > 0.0);

        let scores: Vec<f64> = results.iter().filter_map(|r| r.fused_score()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn upsert_replaces_existing_document() {
        let store = store();
        store
            .insert(Document::new("shoes", "green hat").with_embedding(vec![0.0, 1.0]))
            .unwrap();
        assert_eq!(store.len(), 3);

        let params = FusionParams {
            semantic_weight: 0.0,
            ..Default::default()
        };
        let results = store.search("hat", &[1.0, 0.0], &params).unwrap();
        assert_eq!(ids(&results), vec!["shoes"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn deadline_fires_while_scan_is_stuck() {
        let store = store();
        let held = store.lock();

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            store.fuse("red shoes", &[1.0, 0.0], &FusionParams::default()),
        )
        .await;
        assert!(outcome.is_err());

        drop(held);
        let results = store
            .fuse("red shoes", &[1.0, 0.0], &FusionParams::default())
            .await
            .unwrap();
        assert_eq!(ids(&results)[0], "shoes");
    }

    #[test]
    fn load_json_reads_document_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            r#"[
                { "id": "a", "content": "red shoes", "metadata": { "sku": 1 }, "embedding": [1.0, 0.0] },
                { "id": "b", "content": "blue hat" }
            ]"#,
        )
        .unwrap();

        let store = InMemoryStore::load_json(&path, 2).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn load_json_reports_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            InMemoryStore::load_json(&path, 2),
            Err(FusionError::InvalidDocument(_))
        ));
        assert!(matches!(
            InMemoryStore::load_json(&dir.path().join("missing.json"), 2),
            Err(FusionError::Io(_))
        ));
    }
}
