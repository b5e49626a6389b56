//! Lexical (full-text) ranking for the in-memory backend.
//!
//! Wraps the [`bm25`](https://crates.io/crates/bm25) crate. Query and
//! documents go through the same English tokenizer (lowercasing, stop words,
//! stemming), so "Shoes" matches "shoe". Documents that share no term with
//! the query are left out of the ranking entirely.

use std::collections::HashSet;

use bm25::{Document, Language, SearchEngine, SearchEngineBuilder};

/// BM25 index keyed by a caller-chosen `u64`.
///
/// Not internally synchronized; [`InMemoryStore`](crate::InMemoryStore)
/// keeps it behind its corpus lock.
pub struct LexicalRanker {
    engine: SearchEngine<u64>,
    keys: HashSet<u64>,
}

impl LexicalRanker {
    pub fn new() -> Self {
        let empty_docs: Vec<Document<u64>> = vec![];
        let engine = SearchEngineBuilder::<u64>::with_documents(Language::English, empty_docs).build();
        Self {
            engine,
            keys: HashSet::new(),
        }
    }

    /// Index `text` under `key`, replacing any earlier text for that key.
    pub fn upsert(&mut self, key: u64, text: String) {
        self.engine.upsert(Document {
            id: key,
            contents: text,
        });
        self.keys.insert(key);
    }

    /// Keys of matching documents, best first. Equal scores order by key.
    pub fn rank(&self, query: &str) -> Vec<u64> {
        if self.keys.is_empty() || query.trim().is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(u64, f32)> = self
            .engine
            .search(query, self.keys.len())
            .into_iter()
            .filter(|result| result.score > 0.0)
            .map(|result| (result.document.id, result.score))
            .collect();
        hits.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        hits.into_iter().map(|(key, _)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for LexicalRanker {
    fn default() -> Self {
        Self::new()
    }
}
