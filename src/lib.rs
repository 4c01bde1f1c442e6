//! Workspace umbrella crate for spendcat.
//!
//! This crate stitches the stage crates together so callers can go from raw
//! statement output to categorised transactions with a handful of calls:
//!
//! 1. [`parse_statement`] turns document-understanding output into
//!    [`TransactionRecord`]s.
//! 2. [`embed_transaction`] / [`embed_missing`] attach embeddings through any
//!    [`Embedder`].
//! 3. [`reference_set`] selects the categorised history to vote with.
//! 4. [`classify_transactions`] runs the nearest-neighbour vote and writes the
//!    winning category back onto each accepted record.

pub mod config;

pub use crate::config::{ConfigLoadError, SpendcatConfig};
pub use index::{
    EmbeddingVector, IndexError, LabeledTransaction, LinearScan, Neighbor, NeighborSearch,
    cosine_similarity, find_nearest,
};
pub use ingest::{
    IngestConfig, IngestError, TransactionKind, TransactionRecord, embedding_text,
    parse_statement,
};
pub use matcher::{
    AbstainReason, Classification, ClassificationDecision, Classifier, ClassifierConfig,
    ClassifyMetrics, MatchError, decide, set_classify_metrics,
};
pub use semantic::{
    Embedder, HttpEmbedder, SemanticConfig, SemanticError, StubEmbedder, embedder_from_config,
};

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{Level, debug, info};

/// Errors that can occur while moving transactions through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Ingest(IngestError),
    Semantic(SemanticError),
    /// Classifying one pending transaction failed.
    Classify {
        transaction_id: String,
        error: MatchError,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Semantic(err) => write!(f, "embedding failure: {err}"),
            PipelineError::Classify {
                transaction_id,
                error,
            } => write!(f, "classification of transaction {transaction_id} failed: {error}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Semantic(err) => Some(err),
            PipelineError::Classify { error, .. } => Some(error),
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<SemanticError> for PipelineError {
    fn from(value: SemanticError) -> Self {
        PipelineError::Semantic(value)
    }
}

/// Outcome of classifying one pending transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub transaction_id: String,
    pub decision: ClassificationDecision,
    /// Neighbours that voted, best first.
    pub neighbors: Vec<Neighbor>,
}

/// Categorised, embedded records usable as classification references.
///
/// Records missing either an embedding or a non-blank category are skipped.
pub fn reference_set(records: &[TransactionRecord]) -> Vec<LabeledTransaction> {
    let references: Vec<LabeledTransaction> = records
        .iter()
        .filter_map(TransactionRecord::reference_item)
        .collect();
    let skipped = records.len() - references.len();
    if skipped > 0 {
        debug!(
            kept = references.len(),
            skipped, "reference_set_skipped_records"
        );
    }
    references
}

/// Compute and store the embedding for one record.
pub async fn embed_transaction<E>(
    embedder: &E,
    record: &mut TransactionRecord,
) -> Result<(), PipelineError>
where
    E: Embedder + ?Sized,
{
    let text = embedding_text(record);
    let embedding = embedder.embed(&text).await?;
    record.embedding = Some(embedding);
    Ok(())
}

/// Embed every record that has no embedding yet; returns how many were embedded.
pub async fn embed_missing<E>(
    embedder: &E,
    records: &mut [TransactionRecord],
) -> Result<usize, PipelineError>
where
    E: Embedder + ?Sized,
{
    let mut embedded = 0;
    for record in records.iter_mut().filter(|r| r.embedding.is_none()) {
        embed_transaction(embedder, record).await?;
        embedded += 1;
    }
    if embedded > 0 {
        info!(
            embedded,
            model = embedder.model_name(),
            "transactions_embedded"
        );
    }
    Ok(embedded)
}

/// Classify pending records against `references`.
///
/// Accepted decisions set the record's category; abstentions leave it
/// untouched. Nothing is modified unless every record classifies without
/// error; a record without an embedding fails with
/// [`IngestError::MissingField`], and search failures name the pending
/// transaction in [`PipelineError::Classify`]. Reports come back in the order
/// of `pending`.
pub fn classify_transactions<S: NeighborSearch>(
    classifier: &Classifier<S>,
    pending: &mut [TransactionRecord],
    references: &[LabeledTransaction],
) -> Result<Vec<ClassificationReport>, PipelineError> {
    let span = tracing::span!(
        Level::INFO,
        "pipeline.classify",
        pending = pending.len(),
        references = references.len(),
        k = classifier.config().k
    );
    let _guard = span.enter();

    let queries = pending
        .iter()
        .map(|record| record.require_embedding().cloned())
        .collect::<Result<Vec<_>, _>>()?;

    let classifications = classifier
        .classify_batch(&queries, references)
        .into_iter()
        .zip(pending.iter())
        .map(|(result, record)| {
            result.map_err(|error| PipelineError::Classify {
                transaction_id: record.id.clone(),
                error,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut reports = Vec::with_capacity(pending.len());
    for (record, Classification { neighbors, decision }) in
        pending.iter_mut().zip(classifications)
    {
        match decision.category() {
            Some(category) => {
                info!(
                    transaction_id = %record.id,
                    category,
                    average_similarity = decision.average_similarity,
                    "classification_accepted"
                );
                record.category = Some(category.to_string());
            }
            None => {
                info!(
                    transaction_id = %record.id,
                    reason = ?decision.abstain_reason,
                    average_similarity = decision.average_similarity,
                    "classification_abstained"
                );
            }
        }
        reports.push(ClassificationReport {
            transaction_id: record.id.clone(),
            decision,
            neighbors,
        });
    }
    Ok(reports)
}
