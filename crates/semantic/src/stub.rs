use async_trait::async_trait;
use fxhash::hash64;
use index::EmbeddingVector;

use crate::embedder::{finish_vector, Embedder};
use crate::normalize::l2_normalize_in_place;
use crate::{SemanticConfig, SemanticError};

/// Deterministic offline embedder.
///
/// Generates sinusoid values derived from a hash of the input text, so the
/// same text always maps to the same vector with minimal CPU cost. Useful for
/// tests and for running the pipeline without network access; the vectors
/// carry no meaning beyond text identity.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            model_name: "stub".into(),
            dimension,
            normalize: true,
        }
    }

    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        Ok(Self {
            model_name: format!("stub:{}", cfg.model_name),
            dimension: cfg.stub_dimension(),
            normalize: cfg.normalize,
        })
    }

    pub(crate) fn make_vector(&self, text: &str) -> Vec<f64> {
        let mut v = vec![0f64; self.dimension];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            let mixed = h.rotate_left((idx % 64) as u32) ^ (idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            *value = ((mixed >> 40) as f64 * 0.0001).sin();
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        finish_vector(self.make_vector(text), Some(self.dimension), false)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
