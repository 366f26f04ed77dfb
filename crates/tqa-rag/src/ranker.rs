//! Relatedness ranking of store passages against a query

use std::time::Instant;
use tracing::debug;

use tqa_core::{EmbeddingProvider, Error, Result};

use crate::store::{EmbeddingStore, Passage};

/// Passages considered when building the prompt
pub const PROMPT_TOP_N: usize = 100;
/// Passages reported in the relevance digest
pub const DIGEST_TOP_N: usize = 5;

/// A passage paired with its cosine relatedness to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedResult<'a> {
    pub passage: &'a Passage,
    pub relatedness: f64,
}

/// Cosine similarity in [-1, 1]; 0.0 when either vector has zero norm.
///
/// Both slices must have the same length.
pub fn relatedness(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Rank every passage against an already computed query vector.
///
/// Results are sorted by descending relatedness; equal scores keep store order.
pub fn rank_by_vector<'a>(
    query_vec: &[f64],
    store: &'a EmbeddingStore,
    top_n: usize,
) -> Result<Vec<RankedResult<'a>>> {
    if store.is_empty() {
        return Err(Error::EmptyStore);
    }
    if query_vec.len() != store.dimension() {
        return Err(Error::EmbeddingService(format!(
            "query embedding has {} dimensions, store has {}",
            query_vec.len(),
            store.dimension()
        )));
    }
    if query_vec.iter().any(|v| !v.is_finite()) {
        return Err(Error::EmbeddingService(
            "query embedding contains non-finite values".to_string(),
        ));
    }

    let mut ranked: Vec<RankedResult<'a>> = store
        .passages()
        .iter()
        .map(|passage| RankedResult {
            passage,
            relatedness: relatedness(query_vec, &passage.embedding),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.relatedness.total_cmp(&a.relatedness));
    ranked.truncate(top_n);

    Ok(ranked)
}

/// Embed `query_text` with one provider call and rank the store against it
pub async fn rank<'a, E>(
    embedder: &E,
    query_text: &str,
    store: &'a EmbeddingStore,
    top_n: usize,
) -> Result<Vec<RankedResult<'a>>>
where
    E: EmbeddingProvider + ?Sized,
{
    if store.is_empty() {
        return Err(Error::EmptyStore);
    }

    let started = Instant::now();
    let query_vec = embedder.embed(query_text).await?;
    let ranked = rank_by_vector(&query_vec, store, top_n)?;

    debug!(
        query_chars = query_text.len(),
        top_n,
        returned = ranked.len(),
        best = ranked.first().map(|r| r.relatedness),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ranked passages"
    );

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(vectors: &[(&str, Vec<f64>)]) -> EmbeddingStore {
        EmbeddingStore::from_passages(
            vectors
                .iter()
                .map(|(content, v)| Passage::new(*content, v.clone()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_identical_vectors_are_fully_related() {
        let v = [0.3, -1.2, 4.5, 0.01];
        assert!((relatedness(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_are_unrelated() {
        assert!(relatedness(&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors() {
        assert!((relatedness(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_boundary_is_exact() {
        let r = relatedness(&[1.0, 0.0], &[4.0, 3.0]);
        assert_eq!(r, 0.8);
        assert!(tqa_core::RelevanceDigestEntry::new("x", r, tqa_core::RELEVANCE_THRESHOLD).is_relevant);
    }

    #[test]
    fn test_zero_norm_is_zero_not_nan() {
        assert_eq!(relatedness(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(relatedness(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_ranks_descending_and_truncates() {
        // relatedness to [1, 0]: 0.9, 0.5, 0.95
        let s = store(&[
            ("a", vec![0.9, (1.0f64 - 0.81).sqrt()]),
            ("b", vec![0.5, (1.0f64 - 0.25).sqrt()]),
            ("c", vec![0.95, (1.0f64 - 0.9025).sqrt()]),
        ]);

        let ranked = rank_by_vector(&[1.0, 0.0], &s, 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].passage.content, "c");
        assert_eq!(ranked[1].passage.content, "a");
        assert!((ranked[0].relatedness - 0.95).abs() < 1e-6);
        assert!((ranked[1].relatedness - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let s = store(&[
            ("first", vec![0.0, 1.0]),
            ("second", vec![1.0, 0.0]),
            ("third", vec![0.0, 3.0]),
            ("fourth", vec![2.0, 0.0]),
            ("zero", vec![0.0, 0.0]),
        ]);

        let ranked = rank_by_vector(&[1.0, 0.0], &s, 10).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.passage.content.as_str()).collect();
        assert_eq!(order, vec!["second", "fourth", "first", "third", "zero"]);
    }

    #[test]
    fn test_returns_min_of_top_n_and_store_size() {
        let s = store(&[("a", vec![1.0]), ("b", vec![2.0]), ("c", vec![-1.0])]);
        assert_eq!(rank_by_vector(&[1.0], &s, 100).unwrap().len(), 3);
        assert_eq!(rank_by_vector(&[1.0], &s, 1).unwrap().len(), 1);
        assert!(rank_by_vector(&[1.0], &s, 0).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch_is_embedding_service_error() {
        let s = store(&[("a", vec![1.0, 0.0])]);
        let err = rank_by_vector(&[1.0, 0.0, 0.0], &s, 5).unwrap_err();
        assert!(matches!(err, Error::EmbeddingService(_)));
    }

    #[test]
    fn test_empty_store() {
        let s = EmbeddingStore::default();
        assert!(matches!(rank_by_vector(&[1.0], &s, 5), Err(Error::EmptyStore)));
    }
}
