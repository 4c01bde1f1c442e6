use std::time::Instant;

use index::{EmbeddingVector, LabeledTransaction, LinearScan, NeighborSearch};
use rayon::prelude::*;

use crate::decision::decide;
use crate::metrics::metrics_recorder;
use crate::types::{Classification, ClassifierConfig, MatchError};


/// Search + vote, bundled with a validated configuration.
///
/// A `Classifier` holds no per-call state; one instance can serve any number
/// of threads concurrently.
#[derive(Debug, Clone)]
pub struct Classifier<S = LinearScan> {
    search: S,
    cfg: ClassifierConfig,
}

impl Classifier<LinearScan> {
    /// Linear-scan classifier with the given configuration.
    pub fn new(cfg: ClassifierConfig) -> Result<Self, MatchError> {
        Self::with_search(LinearScan, cfg)
    }
}

impl<S: NeighborSearch> Classifier<S> {
    /// Classifier over a custom neighbour search strategy.
    pub fn with_search(search: S, cfg: ClassifierConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { search, cfg })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.cfg
    }

    /// Find the `k` nearest references to `query` and vote on a category.
    ///
    /// Abstentions come back as `Ok` with `decision.accepted == false`; only
    /// invalid input (dimension mismatches) is an error.
    pub fn classify(
        &self,
        query: &EmbeddingVector,
        references: &[LabeledTransaction],
    ) -> Result<Classification, MatchError> {
        let start = Instant::now();
        let neighbors = self.search.find_nearest(query, references, self.cfg.k)?;
        let decision = decide(&neighbors, self.cfg.min_average_similarity);

        if let Some(recorder) = metrics_recorder() {
            recorder.record_classify(start.elapsed(), neighbors.len(), decision.accepted);
        }

        Ok(Classification {
            neighbors,
            decision,
        })
    }

    /// Classify many queries against the same references in parallel.
    ///
    /// Output order matches `queries`; each query succeeds or fails on its own.
    pub fn classify_batch(
        &self,
        queries: &[EmbeddingVector],
        references: &[LabeledTransaction],
    ) -> Vec<Result<Classification, MatchError>> {
        queries
            .par_iter()
            .map(|query| self.classify(query, references))
            .collect()
    }
}
