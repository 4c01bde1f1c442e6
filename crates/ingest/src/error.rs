//! Error types produced by the ingest crate.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`InvalidStatement`](IngestError::InvalidStatement) | Service output is not the expected JSON document |
//! | [`InvalidDate`](IngestError::InvalidDate) | A date is not `YYYY-MM-DD` |
//! | [`InvalidKind`](IngestError::InvalidKind) | A movement type is neither `debit` nor `credit` |
//! | [`MissingField`](IngestError::MissingField) | A record lacks a field the caller needs |
//! | [`InvalidEmbedding`](IngestError::InvalidEmbedding) | Stored embedding data cannot be decoded |
use thiserror::Error;

/// Errors raised while turning statement data into transaction records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The document-understanding output could not be parsed.
    #[error("invalid statement: {0}")]
    InvalidStatement(String),

    /// A transaction date is not an ISO calendar date.
    #[error("invalid date {value:?} in transaction {index}")]
    InvalidDate { index: usize, value: String },

    /// A transaction type is neither `debit` nor `credit`.
    #[error("invalid transaction type {0:?}; expected \"debit\" or \"credit\"")]
    InvalidKind(String),

    /// A required field is absent on a record.
    #[error("transaction {id} is missing {field}")]
    MissingField { id: String, field: &'static str },

    /// A stored embedding is malformed.
    #[error("invalid embedding: {0}")]
    InvalidEmbedding(String),
}
