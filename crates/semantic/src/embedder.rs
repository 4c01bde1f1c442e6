use async_trait::async_trait;
use index::EmbeddingVector;

use crate::api::HttpEmbedder;
use crate::normalize::l2_normalize_in_place;
use crate::stub::StubEmbedder;
use crate::{SemanticConfig, SemanticError};

/// Anything that turns transaction text into an embedding.
///
/// Implementations must be deterministic for a fixed model: the same text
/// should map to the same vector, otherwise stored references drift.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError>;

    /// Identifier of the model behind this embedder.
    fn model_name(&self) -> &str;
}

/// Build the embedder selected by `cfg.mode`.
pub fn embedder_from_config(cfg: &SemanticConfig) -> Result<Box<dyn Embedder>, SemanticError> {
    cfg.validate()?;
    match cfg.mode.as_str() {
        "stub" => Ok(Box::new(StubEmbedder::from_config(cfg)?)),
        _ => Ok(Box::new(HttpEmbedder::new(cfg)?)),
    }
}

/// Shared post-processing: optional normalization, dimension check, finiteness.
pub(crate) fn finish_vector(
    mut values: Vec<f64>,
    expected_dim: Option<usize>,
    normalize: bool,
) -> Result<EmbeddingVector, SemanticError> {
    if let Some(expected) = expected_dim {
        if values.len() != expected {
            return Err(SemanticError::DimensionMismatch {
                expected,
                found: values.len(),
            });
        }
    }
    if values.is_empty() {
        return Err(SemanticError::InvalidResponse("embedding is empty".into()));
    }
    if normalize {
        l2_normalize_in_place(&mut values);
    }
    EmbeddingVector::new(values).map_err(|e| SemanticError::InvalidResponse(e.to_string()))
}
