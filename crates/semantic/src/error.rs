use thiserror::Error;

/// Errors surfaced by embedding producers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Configuration is inconsistent (unknown mode, empty endpoint, zero dimension).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The HTTP call failed or the service answered with a non-success status.
    #[error("embedding request failed: {0}")]
    Request(String),
    /// The service answered but the body did not hold a usable embedding.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
    /// The produced vector does not have the configured dimension.
    #[error("embedding dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
