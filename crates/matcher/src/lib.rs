//! # spendcat Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the similarity index (`index`). It takes the
//! ranked neighbours of an uncategorised transaction and decides which
//! spending category, if any, to assign.
//!
//! The policy has two independent gates, both required for acceptance:
//!
//! - **Majority vote**: the category carried by the most neighbours wins; ties
//!   go to the category whose best representative ranks highest.
//! - **Confidence floor**: the mean similarity of the whole neighbourhood must
//!   reach [`ClassifierConfig::min_average_similarity`]. This guards against
//!   unanimous agreement among neighbours that are all far away.
//!
//! Abstaining is a normal outcome, not an error: the decision comes back with
//! `accepted == false`, an empty category and an [`AbstainReason`].
//!
//! ## Core Types
//!
//! - [`decide`]: the pure vote over a neighbour list.
//! - [`ClassifierConfig`]: `k` and the confidence floor, passed explicitly.
//! - [`Classifier`]: search + vote with a validated config; batch-parallel.
//! - [`ClassificationDecision`] / [`Classification`]: outputs.
//!
//! ## Example Usage
//!
//! ```
//! use index::{EmbeddingVector, LabeledTransaction};
//! use matcher::{Classifier, ClassifierConfig};
//!
//! let refs = vec![
//!     LabeledTransaction::new("1", EmbeddingVector::new(vec![1.0, 0.1]).unwrap(), "groceries").unwrap(),
//!     LabeledTransaction::new("2", EmbeddingVector::new(vec![0.9, 0.2]).unwrap(), "groceries").unwrap(),
//!     LabeledTransaction::new("3", EmbeddingVector::new(vec![0.1, 1.0]).unwrap(), "cinema").unwrap(),
//! ];
//!
//! let classifier = Classifier::new(ClassifierConfig::new(2, 0.1)).unwrap();
//! let result = classifier
//!     .classify(&EmbeddingVector::new(vec![1.0, 0.0]).unwrap(), &refs)
//!     .unwrap();
//! assert_eq!(result.decision.category(), Some("groceries"));
//! ```
//!
//! ## Observability
//!
//! Install a [`ClassifyMetrics`] implementation via [`set_classify_metrics`] to
//! record per-call latency and outcomes. The engine itself never logs.

pub mod decision;
pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::decision::decide;
pub use crate::engine::Classifier;
pub use crate::metrics::{set_classify_metrics, ClassifyMetrics};
pub use crate::types::{
    AbstainReason, Classification, ClassificationDecision, ClassifierConfig, MatchError,
};
