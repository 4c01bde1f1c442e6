use std::cmp::Ordering;

use ndarray::Array1;

use crate::{EmbeddingVector, IndexError, LabeledTransaction, Neighbor};

/// Strategy for ranking reference transactions against a query embedding.
///
/// Implementations must return at most `k` neighbours ordered by descending
/// cosine similarity, break ties by reference order, and reject `k == 0` and
/// dimension mismatches without producing partial output.
pub trait NeighborSearch: Send + Sync {
    fn find_nearest(
        &self,
        query: &EmbeddingVector,
        references: &[LabeledTransaction],
        k: usize,
    ) -> Result<Vec<Neighbor>, IndexError>;
}

/// Exhaustive scan over every reference. O(references x D).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl NeighborSearch for LinearScan {
    fn find_nearest(
        &self,
        query: &EmbeddingVector,
        references: &[LabeledTransaction],
        k: usize,
    ) -> Result<Vec<Neighbor>, IndexError> {
        find_nearest(query, references, k)
    }
}

/// Return the `k` references most similar to `query`, best first.
///
/// An empty reference set yields an empty result. Every reference is checked
/// before anything is ranked, so a single bad dimension fails the whole call.
pub fn find_nearest(
    query: &EmbeddingVector,
    references: &[LabeledTransaction],
    k: usize,
) -> Result<Vec<Neighbor>, IndexError> {
    if k == 0 {
        return Err(IndexError::InvalidArgument(
            "k must be greater than zero".into(),
        ));
    }

    let dim = query.dim();
    if let Some(bad) = references.iter().find(|r| r.embedding.dim() != dim) {
        return Err(IndexError::DimensionMismatch {
            id: bad.id.clone(),
            expected: dim,
            found: bad.embedding.dim(),
        });
    }

    let query_dir = query.direction();
    let mut neighbors: Vec<Neighbor> = references
        .iter()
        .map(|r| Neighbor {
            id: r.id.clone(),
            similarity: cosine_of(query_dir.as_ref(), &r.embedding),
            category: r.category.clone(),
        })
        .collect();

    // `sort_by` is stable: equal scores keep their reference order.
    neighbors.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    neighbors.truncate(k);
    Ok(neighbors)
}

/// Cosine similarity of two equal-length embeddings.
///
/// Defined as exactly `0.0` when either vector has zero magnitude.
pub fn cosine_similarity(a: &EmbeddingVector, b: &EmbeddingVector) -> Result<f64, IndexError> {
    if a.dim() != b.dim() {
        return Err(IndexError::DimensionMismatch {
            id: "operand".into(),
            expected: a.dim(),
            found: b.dim(),
        });
    }
    Ok(cosine_of(a.direction().as_ref(), b))
}

/// Dot product of unit directions; scale-invariant, so any finite non-zero
/// vector has self-similarity 1.
#[inline]
fn cosine_of(a_dir: Option<&Array1<f64>>, b: &EmbeddingVector) -> f64 {
    match (a_dir, b.direction()) {
        (Some(a_dir), Some(b_dir)) => a_dir.dot(&b_dir).clamp(-1.0, 1.0),
        _ => 0.0,
    }
}
