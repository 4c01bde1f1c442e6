//! # spendcat Index
//!
//! Nearest-neighbour search over transaction embeddings. Given a query
//! embedding and a reference collection of already-categorised transactions,
//! [`find_nearest`] scores every reference with cosine similarity and returns
//! the top `k`, best first.
//!
//! ## Guarantees
//!
//! - **Pure**: no state is kept between calls; the reference slice is only read.
//!   Concurrent calls over a shared reference set need no synchronisation.
//! - **Deterministic**: ties keep reference order (stable sort), so identical
//!   inputs always produce identical output.
//! - **Strict dimensions**: a reference whose length differs from the query
//!   fails the whole call with [`IndexError::DimensionMismatch`].
//! - **Zero vectors**: similarity involving a zero-magnitude vector is `0.0`.
//!
//! The scan is linear. [`NeighborSearch`] is the seam for swapping in an
//! approximate index once reference sets outgrow it.
//!
//! ## Example
//!
//! ```
//! use index::{find_nearest, EmbeddingVector, LabeledTransaction};
//!
//! let refs = vec![
//!     LabeledTransaction::new("1", EmbeddingVector::new(vec![1.0, 0.0]).unwrap(), "groceries").unwrap(),
//!     LabeledTransaction::new("2", EmbeddingVector::new(vec![0.0, 1.0]).unwrap(), "transport").unwrap(),
//! ];
//! let query = EmbeddingVector::new(vec![0.9, 0.1]).unwrap();
//!
//! let hits = find_nearest(&query, &refs, 1).unwrap();
//! assert_eq!(hits[0].category, "groceries");
//! ```

mod query;
mod vector;

pub use crate::query::{cosine_similarity, find_nearest, LinearScan, NeighborSearch};
pub use crate::vector::{EmbeddingVector, LabeledTransaction, Neighbor};

use thiserror::Error;

/// Errors surfaced by the similarity index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A vector's length differs from the query's.
    #[error("embedding dimension mismatch for {id}: expected {expected}, found {found}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
    /// Bad caller input: `k == 0`, malformed or non-finite vector data, blank labels.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
