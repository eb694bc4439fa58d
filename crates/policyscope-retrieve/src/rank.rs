//! Cosine ranking over the embedding index.
//!
//! A full linear scan: every record is scored against the query vector and
//! the top K survive. The corpus fits in memory, so there is no approximate
//! index — a scaling limit, not a correctness one.

use ndarray::{aview1, ArrayView1};

use policyscope_core::{Error, Result};
use policyscope_store::EmbeddingIndex;

/// One index record ranked against a query.
#[derive(Debug, Clone)]
pub struct PageHit {
    pub document_id: String,
    pub page: u32,
    pub similarity: f32,
}

/// Cosine similarity with a zero-vector guard: when either norm is zero the
/// denominator is replaced by 1, yielding similarity 0 instead of NaN.
pub fn cosine_similarity(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    let dot = a.dot(&b);
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom == 0.0 {
        dot
    } else {
        dot / denom
    }
}

/// Rank every index record against `query` and keep the top `k`.
///
/// Ties break on (document_id, page) so repeated runs produce the same
/// order. A query whose dimension differs from the index is a hard error.
pub fn top_k(index: &EmbeddingIndex, query: &[f32], k: usize) -> Result<Vec<PageHit>> {
    if query.len() != index.dimension() {
        return Err(Error::Embedding(format!(
            "query dimension {} does not match index dimension {}",
            query.len(),
            index.dimension()
        )));
    }

    let q = aview1(query);
    let mut hits: Vec<PageHit> = index
        .records()
        .iter()
        .map(|record| PageHit {
            document_id: record.document_id.clone(),
            page: record.page,
            similarity: cosine_similarity(record.vector.view(), q),
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
            .then_with(|| a.page.cmp(&b.page))
    });
    hits.truncate(k);
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use policyscope_store::EmbeddingRecord;

    fn record(document_id: &str, page: u32, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            document_id: document_id.to_string(),
            page,
            vector: vector.into(),
        }
    }

    #[test]
    fn test_cosine_self_is_one() {
        let v = array![0.3f32, -0.8, 0.5];
        let sim = cosine_similarity(v.view(), v.view());
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_symmetric_and_bounded() {
        let a = array![1.0f32, 2.0, -1.0];
        let b = array![-0.5f32, 1.5, 3.0];
        let ab = cosine_similarity(a.view(), b.view());
        let ba = cosine_similarity(b.view(), a.view());
        assert!((ab - ba).abs() < 1e-6);
        assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn test_cosine_zero_vector() {
        let zero = array![0.0f32, 0.0];
        let v = array![1.0f32, 1.0];
        assert_eq!(cosine_similarity(zero.view(), v.view()), 0.0);
    }

    #[test]
    fn test_top_k_order_and_determinism() {
        let index = EmbeddingIndex::from_records(
            "test",
            2,
            vec![
                record("a.pdf", 1, vec![1.0, 0.0]),
                record("a.pdf", 2, vec![0.0, 1.0]),
                record("b.pdf", 1, vec![0.7, 0.7]),
            ],
        );

        let first = top_k(&index, &[1.0, 0.0], 2).unwrap();
        let second = top_k(&index, &[1.0, 0.0], 2).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].document_id, "a.pdf");
        assert_eq!(first[0].page, 1);
        assert!(first[0].similarity > first[1].similarity);

        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(x.document_id, y.document_id);
            assert_eq!(x.page, y.page);
        }
    }

    #[test]
    fn test_top_k_dimension_mismatch() {
        let index = EmbeddingIndex::from_records("test", 3, vec![record("a.pdf", 1, vec![1.0, 0.0, 0.0])]);
        let err = top_k(&index, &[1.0, 0.0], 5).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }
}
