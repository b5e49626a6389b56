//! Semantic ranking by cosine similarity.

use semantic::cosine_similarity;

/// Rank `candidates` by cosine similarity to `query`, most similar first.
///
/// Every candidate gets a rank; equal similarities order by key.
pub fn rank_by_similarity<'a, K, I>(query: &[f32], candidates: I) -> Vec<K>
where
    K: Ord + Clone,
    I: IntoIterator<Item = (K, &'a [f32])>,
{
    let mut scored: Vec<(K, f32)> = candidates
        .into_iter()
        .map(|(key, embedding)| (key, cosine_similarity(query, embedding)))
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.into_iter().map(|(key, _)| key).collect()
}
