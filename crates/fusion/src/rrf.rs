//! Reciprocal Rank Fusion: `score = Σ weight_i / (k + rank_i)`
//!
//! Pure and deterministic. Ranks are 1-based positions in each input list.

use std::collections::HashMap;
use std::hash::Hash;

use crate::FusionParams;

/// A document after fusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Fused<K> {
    pub key: K,
    pub score: f64,
    pub lexical_rank: Option<usize>,
    pub semantic_rank: Option<usize>,
}

/// Weighted reciprocal term for a 1-based `rank`.
pub fn reciprocal_rank(rank: usize, k: u32, weight: f64) -> f64 {
    weight / (f64::from(k) + rank as f64)
}

/// Fuse a lexical and a semantic ranking.
///
/// Each slice lists document keys best-first; a key repeated inside one
/// list keeps its first (best) rank. Documents with a fused score of zero
/// are dropped, the rest are sorted by descending score with ties broken by
/// ascending key, then truncated to `params.match_count`.
pub fn fuse_rankings<K>(lexical: &[K], semantic: &[K], params: &FusionParams) -> Vec<Fused<K>>
where
    K: Eq + Hash + Ord + Clone,
{
    let mut slots: HashMap<K, usize> = HashMap::with_capacity(lexical.len() + semantic.len());
    let mut fused: Vec<Fused<K>> = Vec::with_capacity(lexical.len() + semantic.len());

    let mut slot_for = |key: &K, fused: &mut Vec<Fused<K>>| -> usize {
        *slots.entry(key.clone()).or_insert_with(|| {
            fused.push(Fused {
                key: key.clone(),
                score: 0.0,
                lexical_rank: None,
                semantic_rank: None,
            });
            fused.len() - 1
        })
    };

    for (idx, key) in lexical.iter().enumerate() {
        let slot = slot_for(key, &mut fused);
        fused[slot].lexical_rank.get_or_insert(idx + 1);
    }
    for (idx, key) in semantic.iter().enumerate() {
        let slot = slot_for(key, &mut fused);
        fused[slot].semantic_rank.get_or_insert(idx + 1);
    }

    for entry in fused.iter_mut() {
        let lexical = entry
            .lexical_rank
            .map(|r| reciprocal_rank(r, params.rrf_k, params.full_text_weight))
            .unwrap_or(0.0);
        let semantic = entry
            .semantic_rank
            .map(|r| reciprocal_rank(r, params.rrf_k, params.semantic_weight))
            .unwrap_or(0.0);
        entry.score = lexical + semantic;
    }

    fused.retain(|entry| entry.score > 0.0);
    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    fused.truncate(params.match_count as usize);
    fused
}
